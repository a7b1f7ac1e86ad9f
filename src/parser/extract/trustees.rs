use scraper::Html;

use crate::parser::{selector, text_of, Markers};
use crate::store::{Category, TeamRecord};

const DESIGNATION: &str = "Trustee";
const PROVENANCE: &str = "Trustee Section";

/// Trustee cards: first matching section only, one record per card that
/// carries a name heading. Cards without one are decorative and skipped.
pub fn extract(doc: &Html, m: &Markers) -> Vec<TeamRecord> {
    let mut out = Vec::new();
    let Some(section_sel) = selector(&m.trustee_section) else {
        return out;
    };
    let (Some(card_sel), Some(body_sel), Some(title_sel), Some(text_sel), Some(img_sel)) = (
        selector(&m.trustee_card),
        selector(&m.card_body),
        selector(&m.card_title),
        selector(&m.card_text),
        selector(&m.card_image),
    ) else {
        return out;
    };

    let Some(section) = doc.select(&section_sel).next() else {
        return out;
    };

    for card in section.select(&card_sel) {
        let Some(body) = card.select(&body_sel).next() else {
            continue;
        };
        let name = match body.select(&title_sel).next() {
            Some(el) => text_of(&el),
            None => continue,
        };
        if name.is_empty() {
            continue;
        }

        let image_url = body
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or_default()
            .to_string();
        let description = body
            .select(&text_sel)
            .next()
            .map(|el| text_of(&el))
            .unwrap_or_default();

        out.push(TeamRecord {
            name,
            designation: DESIGNATION.to_string(),
            description,
            additional_info: PROVENANCE.to_string(),
            image_url,
            image_filename: String::new(),
            category: Category::Trustee,
        });
    }

    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Vec<TeamRecord> {
        extract(&Html::parse_document(html), &Markers::default())
    }

    #[test]
    fn card_fields() {
        let html = r#"
            <section class="why-cancer-section-4">
              <div class="col">
                <div class="card-body">
                  <img src="/images/team/anis.jpg">
                  <h5 class="card-title">Mr. Anis A. Khan</h5>
                  <p class="card-text">A distinguished banker and philanthropist.</p>
                </div>
              </div>
            </section>"#;
        let records = parse(html);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Mr. Anis A. Khan");
        assert_eq!(r.designation, "Trustee");
        assert_eq!(r.description, "A distinguished banker and philanthropist.");
        assert_eq!(r.additional_info, "Trustee Section");
        assert_eq!(r.image_url, "/images/team/anis.jpg");
        assert_eq!(r.image_filename, "");
        assert_eq!(r.category, Category::Trustee);
    }

    #[test]
    fn card_without_heading_is_skipped() {
        let html = r#"
            <section class="why-cancer-section-4">
              <div class="col">
                <div class="card-body">
                  <img src="/images/decor.jpg">
                  <p class="card-text">Not a person.</p>
                </div>
              </div>
              <div class="col">
                <div class="card-body">
                  <h5 class="card-title">Dr. Sayeba Akhter</h5>
                </div>
              </div>
            </section>"#;
        let records = parse(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Dr. Sayeba Akhter");
    }

    #[test]
    fn card_without_body_is_skipped() {
        let html = r#"
            <section class="why-cancer-section-4">
              <div class="col"><h5 class="card-title">Stray Heading</h5></div>
            </section>"#;
        assert!(parse(html).is_empty());
    }

    #[test]
    fn missing_image_and_blurb_leave_empty_fields() {
        let html = r#"
            <section class="why-cancer-section-4">
              <div class="col">
                <div class="card-body"><h5 class="card-title">Dr. Sayeba Akhter</h5></div>
              </div>
            </section>"#;
        let records = parse(html);
        assert_eq!(records[0].image_url, "");
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn missing_section_yields_nothing() {
        assert!(parse("<section class='other'><div class='col'></div></section>").is_empty());
    }
}
