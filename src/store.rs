use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which document section a record came from. Closed set: the remote
/// API rejects anything else, so unknown categories are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trustee,
    Ambassador,
    Leadership,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trustee => "trustee",
            Category::Ambassador => "ambassador",
            Category::Leadership => "leadership",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub designation: String,
    pub description: String,
    /// Provenance tag: which extraction pass produced the record.
    pub additional_info: String,
    pub image_url: String,
    /// Empty unless an image fetch was attempted and succeeded.
    pub image_filename: String,
    pub category: Category,
}

impl TeamRecord {
    /// Bio sent to the remote API: description, or the provenance tag
    /// when the pass produced no bio text.
    pub fn bio(&self) -> &str {
        if self.description.is_empty() {
            &self.additional_info
        } else {
            &self.description
        }
    }
}

/// Write the whole record sequence as one JSON array, replacing any
/// previous file. The array order is the display order downstream.
pub fn save(path: &Path, records: &[TeamRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<TeamRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = serde_json::from_str(&json)
        .with_context(|| format!("Malformed record file {}", path.display()))?;
    Ok(records)
}

// ── Tests ──
