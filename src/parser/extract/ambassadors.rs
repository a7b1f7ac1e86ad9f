use scraper::Html;

use crate::parser::{selector, text_of, Markers};
use crate::store::{Category, TeamRecord};

const DEFAULT_DESIGNATION: &str = "Ambassador";
const PROVENANCE: &str = "Ambassador Section";

/// Ambassador cards. The section class is shared by more than one
/// section of the page; only sections carrying the ambassador header
/// are processed. The card image sits outside the card body in this
/// layout, so it is searched from the card root. The blurb is the
/// person's designation, not a bio.
pub fn extract(doc: &Html, m: &Markers) -> Vec<TeamRecord> {
    let mut out = Vec::new();
    let (Some(section_sel), Some(header_sel), Some(card_sel), Some(body_sel)) = (
        selector(&m.ambassador_section),
        selector(&m.ambassador_header),
        selector(&m.ambassador_card),
        selector(&m.card_body),
    ) else {
        return out;
    };
    let (Some(title_sel), Some(text_sel), Some(img_sel)) = (
        selector(&m.card_title),
        selector(&m.card_text),
        selector(&m.ambassador_image),
    ) else {
        return out;
    };

    for section in doc.select(&section_sel) {
        if section.select(&header_sel).next().is_none() {
            continue;
        }

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

            let image_url = card
                .select(&img_sel)
                .next()
                .and_then(|img| img.value().attr("src"))
                .unwrap_or_default()
                .to_string();
            let designation = body
                .select(&text_sel)
                .next()
                .map(|el| text_of(&el))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_DESIGNATION.to_string());

            out.push(TeamRecord {
                name,
                designation,
                description: String::new(),
                additional_info: PROVENANCE.to_string(),
                image_url,
                image_filename: String::new(),
                category: Category::Ambassador,
            });
        }
    }

    out
}

// ── Tests ──
