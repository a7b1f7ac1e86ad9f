pub mod extract;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::store::TeamRecord;

/// Structural markers the extraction passes are pinned to. The source
/// page owns these class names; when it changes, the affected pass
/// silently yields nothing rather than erroring.
#[derive(Debug, Clone)]
pub struct Markers {
    pub trustee_section: String,
    pub trustee_card: String,
    pub card_body: String,
    pub card_title: String,
    pub card_text: String,
    pub card_image: String,
    pub ambassador_section: String,
    pub ambassador_header: String,
    pub ambassador_card: String,
    pub ambassador_image: String,
    pub heading: String,
    pub memorial_target: String,
    pub memorial_row_class: String,
    pub memorial_image: String,
    pub memorial_text: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            trustee_section: "section.why-cancer-section-4".into(),
            trustee_card: "div.col".into(),
            card_body: "div.card-body".into(),
            card_title: "h5.card-title".into(),
            card_text: "p.card-text".into(),
            card_image: "img".into(),
            ambassador_section: "section.why-cancer-section-5".into(),
            ambassador_header: "h4.ambassador".into(),
            ambassador_card: "div.card".into(),
            ambassador_image: "img.card-img-top".into(),
            heading: "h4".into(),
            memorial_target: "Rokia Afzal Rahman".into(),
            memorial_row_class: "row".into(),
            memorial_image: "div.why-cancer-section-1-image img".into(),
            memorial_text: "div.why-cancer-section-1-text".into(),
        }
    }
}

/// Three-pass pipeline over one document: trustees, ambassadors, then
/// the memorial entry, appended in that order. Pure — image resolution
/// happens afterwards, against the returned records.
pub fn extract_records(html: &str, markers: &Markers) -> Vec<TeamRecord> {
    let doc = Html::parse_document(html);
    let mut records = Vec::new();
    records.extend(extract::trustees::extract(&doc, markers));
    records.extend(extract::ambassadors::extract(&doc, markers));
    records.extend(extract::memorial::extract(&doc, markers));
    records
}

pub(crate) fn selector(s: &str) -> Option<Selector> {
    match Selector::parse(s) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!("Invalid selector {:?}: {}", s, e);
            None
        }
    }
}

/// Whitespace-normalized text content of an element subtree.
pub(crate) fn text_of(el: &ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──
