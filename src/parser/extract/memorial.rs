use scraper::{ElementRef, Html};

use crate::parser::{selector, text_of, Markers};
use crate::store::{Category, TeamRecord};

const NAME: &str = "Late Ms. Rokia Afzal Rahman";
const DESIGNATION: &str = "Founding President";
const PROVENANCE: &str = "In Memory Section";
const DESCRIPTION_MAX: usize = 500;
const ELLIPSIS: &str = "...";

/// The "in memory of" entry for the founding president. Her write-up is
/// not a card: find the heading carrying her name, walk up to the
/// enclosing row, and collect the image and text blocks from there.
/// Produces at most one record.
pub fn extract(doc: &Html, m: &Markers) -> Vec<TeamRecord> {
    let (Some(heading_sel), Some(image_sel), Some(text_sel)) = (
        selector(&m.heading),
        selector(&m.memorial_image),
        selector(&m.memorial_text),
    ) else {
        return Vec::new();
    };

    for heading in doc.select(&heading_sel) {
        if !text_of(&heading).contains(&m.memorial_target) {
            continue;
        }
        let Some(row) = ancestor_with_class(&heading, &m.memorial_row_class) else {
            continue;
        };

        let image_url = row
            .select(&image_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or_default()
            .to_string();
        let blocks: Vec<String> = row.select(&text_sel).map(|el| text_of(&el)).collect();
        let description = truncate_description(&blocks.join(" "));

        return vec![TeamRecord {
            name: NAME.to_string(),
            designation: DESIGNATION.to_string(),
            description,
            additional_info: PROVENANCE.to_string(),
            image_url,
            image_filename: String::new(),
            category: Category::Leadership,
        }];
    }

    Vec::new()
}

fn ancestor_with_class<'a>(el: &ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    el.ancestors().find_map(|node| {
        let element = ElementRef::wrap(node)?;
        element
            .value()
            .classes()
            .any(|c| c == class)
            .then_some(element)
    })
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_MAX {
        let cut: String = text.chars().take(DESCRIPTION_MAX).collect();
        format!("{}{}", cut, ELLIPSIS)
    } else {
        text.to_string()
    }
}

// ── Tests ──
