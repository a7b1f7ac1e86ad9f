use std::path::Path;

use anyhow::{ensure, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{Category, TeamRecord};

/// Upload-ready shape of a record: every field the remote schema
/// expects, with placeholders the extractor cannot populate left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRecord {
    pub name_en: String,
    pub name_bn: String,
    pub role_en: String,
    pub role_bn: String,
    pub category: Category,
    pub bio_en: String,
    pub bio_bn: String,
    pub order: u32,
    pub is_active: String,
    pub email: String,
    pub linkedin: String,
    #[serde(rename = "imageFilename")]
    pub image_filename: String,
    /// Inline `data:` URI so the generated artifact needs no file access.
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
}

/// One generated browser-console script covering one batch of records.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub contents: String,
}

pub fn transport_records(records: &[TeamRecord], images_dir: &Path) -> Vec<TransportRecord> {
    records
        .iter()
        .map(|r| to_transport(r, images_dir))
        .collect()
}

fn to_transport(record: &TeamRecord, images_dir: &Path) -> TransportRecord {
    let image_base64 = if record.image_filename.is_empty() {
        String::new()
    } else {
        match std::fs::read(images_dir.join(&record.image_filename)) {
            Ok(bytes) => format!("data:image/jpeg;base64,{}", STANDARD.encode(&bytes)),
            Err(e) => {
                debug!("No local image for {}: {}", record.name, e);
                String::new()
            }
        }
    };

    TransportRecord {
        name_en: record.name.clone(),
        name_bn: String::new(),
        role_en: record.designation.clone(),
        role_bn: String::new(),
        category: record.category,
        bio_en: record.description.clone(),
        bio_bn: String::new(),
        order: 0,
        is_active: "1".to_string(),
        email: String::new(),
        linkedin: String::new(),
        image_filename: record.image_filename.clone(),
        image_base64,
    }
}

/// Partition records into contiguous batches of `chunk_size` (the last
/// may be short) and render one self-contained console script per
/// batch. Output is deterministic for a given input sequence.
pub fn build_chunks(
    records: &[TeamRecord],
    chunk_size: usize,
    images_dir: &Path,
    api_base: &str,
) -> Result<Vec<Artifact>> {
    ensure!(chunk_size > 0, "chunk size must be at least 1");

    let transport = transport_records(records, images_dir);
    let mut artifacts = Vec::new();
    for (i, chunk) in transport.chunks(chunk_size).enumerate() {
        let offset = i * chunk_size;
        artifacts.push(Artifact {
            filename: format!("upload_payload_chunk_{}.js", offset),
            contents: render_chunk(offset, chunk, api_base)?,
        });
    }
    Ok(artifacts)
}

/// Console script: embedded record literal, bearer token pulled from
/// localStorage (fails fast when absent), sequential per-record upload
/// with a success/fail tally mirrored onto `window.chunkStatus_{n}`.
fn render_chunk(offset: usize, chunk: &[TransportRecord], api_base: &str) -> Result<String> {
    let data = serde_json::to_string(chunk)?;
    let generated_at = chrono::Utc::now().to_rfc3339();

    Ok(format!(
        r#"// Generated {generated_at}
(async function () {{
    const teamData = {data};
    const token = localStorage.getItem('token');
    if (!token) {{
        console.error("No token found");
        return "No token";
    }}

    console.log("Starting upload of chunk {offset} size " + teamData.length);
    let success = 0;
    let fail = 0;

    for (const item of teamData) {{
        try {{
            const formData = new FormData();
            formData.append('name_en', item.name_en);
            formData.append('role_en', item.role_en);
            formData.append('category', item.category);
            formData.append('bio_en', item.bio_en);
            formData.append('is_active', item.is_active);

            if (item.imageBase64) {{
                const res = await fetch(item.imageBase64);
                const blob = await res.blob();
                formData.append('photo', blob, item.imageFilename);
            }}

            const response = await fetch('{api_base}/admin/team-members', {{
                method: 'POST',
                headers: {{
                    'Authorization': 'Bearer ' + token,
                    'Accept': 'application/json'
                }},
                body: formData
            }});

            if (response.ok) {{
                console.log("Uploaded: " + item.name_en);
                success++;
            }} else {{
                const txt = await response.text();
                console.error("Failed " + item.name_en + ": " + txt);
                fail++;
            }}
        }} catch (e) {{
            console.error("Error " + item.name_en + ": " + e);
            fail++;
        }}
    }}

    window.chunkStatus_{offset} = "Chunk {offset} complete. Success: " + success + ", Fail: " + fail;
    console.log(window.chunkStatus_{offset});
}})();
"#
    ))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> TeamRecord {
        TeamRecord {
            name: name.to_string(),
            designation: "Trustee".to_string(),
            description: "Bio text.".to_string(),
            additional_info: "Trustee Section".to_string(),
            image_url: String::new(),
            image_filename: String::new(),
            category: Category::Trustee,
        }
    }

    #[test]
    fn transport_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let t = &transport_records(&[record("Jane Doe")], dir.path())[0];
        assert_eq!(t.name_en, "Jane Doe");
        assert_eq!(t.role_en, "Trustee");
        assert_eq!(t.bio_en, "Bio text.");
        assert_eq!(t.name_bn, "");
        assert_eq!(t.role_bn, "");
        assert_eq!(t.email, "");
        assert_eq!(t.linkedin, "");
        assert_eq!(t.order, 0);
        assert_eq!(t.is_active, "1");
        assert_eq!(t.image_base64, "");
    }

    #[test]
    fn camel_case_image_keys() {
        let dir = tempfile::tempdir().unwrap();
        let t = &transport_records(&[record("Jane Doe")], dir.path())[0];
        let json = serde_json::to_string(t).unwrap();
        assert!(json.contains("\"imageFilename\""));
        assert!(json.contains("\"imageBase64\""));
        assert!(json.contains("\"category\":\"trustee\""));
    }

    #[test]
    fn image_is_inlined_as_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jane_doe.jpg"), b"fakejpeg").unwrap();
        let mut r = record("Jane Doe");
        r.image_filename = "jane_doe.jpg".to_string();
        let t = &transport_records(&[r], dir.path())[0];
        assert_eq!(
            t.image_base64,
            format!("data:image/jpeg;base64,{}", STANDARD.encode(b"fakejpeg"))
        );
    }

    #[test]
    fn missing_image_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = record("Jane Doe");
        r.image_filename = "gone.jpg".to_string();
        let t = &transport_records(&[r], dir.path())[0];
        assert_eq!(t.image_base64, "");
    }

    #[test]
    fn batching_arithmetic() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<_> = (0..7).map(|i| record(&format!("Person {}", i))).collect();
        let artifacts = build_chunks(&records, 3, dir.path(), "http://localhost:8000/api/v1")
            .unwrap();
        assert_eq!(artifacts.len(), 3); // ceil(7/3)
        assert_eq!(artifacts[0].filename, "upload_payload_chunk_0.js");
        assert_eq!(artifacts[1].filename, "upload_payload_chunk_3.js");
        assert_eq!(artifacts[2].filename, "upload_payload_chunk_6.js");
    }

    #[test]
    fn divisible_input_has_no_short_tail() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<_> = (0..6).map(|i| record(&format!("Person {}", i))).collect();
        let artifacts =
            build_chunks(&records, 3, dir.path(), "http://localhost:8000/api/v1").unwrap();
        assert_eq!(artifacts.len(), 2);
    }

    #[test]
    fn chunks_cover_input_in_order_without_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<_> = (0..7).map(|i| record(&format!("Person {}", i))).collect();
        let artifacts =
            build_chunks(&records, 3, dir.path(), "http://localhost:8000/api/v1").unwrap();

        for (i, artifact) in artifacts.iter().enumerate() {
            let lo = i * 3;
            let hi = (lo + 3).min(records.len());
            for n in 0..records.len() {
                let name = format!("\"Person {}\"", n);
                assert_eq!(
                    artifact.contents.contains(&name),
                    (lo..hi).contains(&n),
                    "record {} in artifact {}",
                    n,
                    i
                );
            }
        }
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_chunks(&[record("X")], 0, dir.path(), "http://x").is_err());
    }

    #[test]
    fn artifact_embeds_endpoint_and_token_check() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts =
            build_chunks(&[record("Jane Doe")], 5, dir.path(), "http://localhost:8000/api/v1")
                .unwrap();
        let js = &artifacts[0].contents;
        assert!(js.contains("localStorage.getItem('token')"));
        assert!(js.contains("http://localhost:8000/api/v1/admin/team-members"));
        assert!(js.contains("window.chunkStatus_0"));
    }
}
