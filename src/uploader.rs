use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::store::TeamRecord;
use crate::tally::{try_each, Tally};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Remote API settings. One struct passed in, no module-level state.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub primary: Credentials,
    pub fallback: Credentials,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            primary: Credentials::new("uploader@bancat.org", "password123"),
            fallback: Credentials::new("admin@bancat.org", "password"),
        }
    }
}

pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, config })
    }

    /// POST credentials to the login endpoint. Any non-200 status or
    /// network error is logged and collapses to None.
    pub async fn login(&self, creds: &Credentials) -> Option<String> {
        let url = format!("{}/login", self.config.base_url);
        let body = serde_json::json!({
            "email": creds.email,
            "password": creds.password,
        });

        let response = match self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Login error: {}", e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!("Login failed: {}", text);
            return None;
        }

        let json: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("Login response not JSON: {}", e);
                return None;
            }
        };
        json.get("access_token")
            .and_then(|t| t.as_str())
            .map(str::to_string)
    }

    /// Try the uploader account, then the admin account. Nothing
    /// downstream can work without a token, so both failing is fatal.
    pub async fn login_with_fallback(&self) -> Result<String> {
        info!("Logging in as {}...", self.config.primary.email);
        if let Some(token) = self.login(&self.config.primary).await {
            return Ok(token);
        }
        println!("Retrying with {}...", self.config.fallback.email);
        if let Some(token) = self.login(&self.config.fallback).await {
            return Ok(token);
        }
        bail!("Cannot proceed without a token: both credential pairs rejected")
    }

    /// Replay the stored team records against the team-members endpoint,
    /// in store order. Per-record failures are logged and tallied, never
    /// fatal.
    pub async fn upload_team(
        &self,
        records: &[TeamRecord],
        images_dir: &Path,
        token: &str,
    ) -> Tally {
        try_each(
            records.iter().enumerate(),
            |(_, r)| r.name.clone(),
            |(index, record)| async move {
                println!("Uploading {}...", record.name);
                let photo = self.load_photo(record, images_dir).await;
                self.post_form(
                    "/admin/team-members",
                    token,
                    team_fields(record, index),
                    photo,
                )
                .await
            },
        )
        .await
    }

    async fn load_photo(
        &self,
        record: &TeamRecord,
        images_dir: &Path,
    ) -> Option<(String, Vec<u8>)> {
        if record.image_filename.is_empty() {
            return None;
        }
        let path = images_dir.join(&record.image_filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some((record.image_filename.clone(), bytes)),
            Err(_) => {
                warn!("Image not found: {}", path.display());
                None
            }
        }
    }

    /// Form-encoded create-request; multipart when a photo rides along.
    pub async fn post_form(
        &self,
        path: &str,
        token: &str,
        fields: Vec<(String, String)>,
        photo: Option<(String, Vec<u8>)>,
    ) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, path);
        let request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json");

        let response = match photo {
            Some((filename, bytes)) => {
                let part = Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str("image/jpeg")?;
                let mut form = Form::new();
                for (key, value) in fields {
                    form = form.text(key, value);
                }
                request.multipart(form.part("photo", part)).send().await?
            }
            None => request.form(&fields).send().await?,
        };

        ensure_created(response).await
    }

    /// JSON create-request for endpoints that take no attachment.
    pub async fn post_json(
        &self,
        path: &str,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        ensure_created(response).await
    }
}

/// 200 and 201 are both success; anything else surfaces the body the
/// server sent, which is meant for human diagnosis.
async fn ensure_created(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status == StatusCode::OK || status == StatusCode::CREATED {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    bail!("HTTP {}: {}", status, body)
}

/// Field set the team-members endpoint expects. The record's position
/// in the store becomes its display order.
fn team_fields(record: &TeamRecord, index: usize) -> Vec<(String, String)> {
    vec![
        ("name_en".to_string(), record.name.clone()),
        ("role_en".to_string(), record.designation.clone()),
        ("category".to_string(), record.category.as_str().to_string()),
        ("bio_en".to_string(), record.bio().to_string()),
        ("order".to_string(), index.to_string()),
        ("is_active".to_string(), "1".to_string()),
    ]
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Category;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn record(name: &str, description: &str) -> TeamRecord {
        TeamRecord {
            name: name.to_string(),
            designation: "Trustee".to_string(),
            description: description.to_string(),
            additional_info: "Trustee Section".to_string(),
            image_url: String::new(),
            image_filename: String::new(),
            category: Category::Trustee,
        }
    }

    #[test]
    fn team_fields_use_store_position_as_order() {
        let fields = team_fields(&record("Jane Doe", "Bio"), 4);
        assert!(fields.contains(&("order".to_string(), "4".to_string())));
        assert!(fields.contains(&("bio_en".to_string(), "Bio".to_string())));
        assert!(fields.contains(&("is_active".to_string(), "1".to_string())));
    }

    #[test]
    fn empty_bio_falls_back_to_provenance_tag() {
        let fields = team_fields(&record("Jane Doe", ""), 0);
        assert!(fields.contains(&("bio_en".to_string(), "Trustee Section".to_string())));
    }

    fn http_response(status_line: &str, body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
        .into_bytes()
    }

    /// One-shot server answering `responses` in order, one per
    /// connection. Returns the base URL and a handle yielding the
    /// request payloads it saw.
    async fn serve(
        responses: Vec<Vec<u8>>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for response in responses {
                let (mut sock, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut sock).await);
                sock.write_all(&response).await.unwrap();
            }
            seen
        });
        (base, handle)
    }

    /// Read headers plus content-length worth of body so request
    /// payloads can be inspected.
    async fn read_request(sock: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let Some(pos) = data
                .windows(4)
                .position(|w| w == b"\r\n\r\n")
            else {
                continue;
            };
            let headers = String::from_utf8_lossy(&data[..pos]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= pos + 4 + content_length {
                break;
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    #[tokio::test]
    async fn login_returns_token_on_200() {
        let (base, _handle) =
            serve(vec![http_response("200 OK", r#"{"access_token":"tok-1"}"#)]).await;
        let client = ApiClient::new(ApiConfig::new(&base)).unwrap();
        let token = client.login(&Credentials::new("a@b.c", "pw")).await;
        assert_eq!(token.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn login_returns_none_on_non_200() {
        let (base, _handle) =
            serve(vec![http_response("401 Unauthorized", r#"{"message":"nope"}"#)]).await;
        let client = ApiClient::new(ApiConfig::new(&base)).unwrap();
        assert!(client.login(&Credentials::new("a@b.c", "pw")).await.is_none());
    }

    #[tokio::test]
    async fn fallback_pair_is_attempted_before_giving_up() {
        let (base, handle) = serve(vec![
            http_response("401 Unauthorized", "{}"),
            http_response("200 OK", r#"{"access_token":"tok-2"}"#),
        ])
        .await;
        let client = ApiClient::new(ApiConfig::new(&base)).unwrap();
        let token = client.login_with_fallback().await.unwrap();
        assert_eq!(token, "tok-2");

        let seen = handle.await.unwrap();
        assert!(seen[0].contains("uploader@bancat.org"));
        assert!(seen[1].contains("admin@bancat.org"));
    }

    #[tokio::test]
    async fn both_pairs_rejected_is_fatal() {
        let (base, handle) = serve(vec![
            http_response("401 Unauthorized", "{}"),
            http_response("401 Unauthorized", "{}"),
        ])
        .await;
        let client = ApiClient::new(ApiConfig::new(&base)).unwrap();
        assert!(client.login_with_fallback().await.is_err());
        assert_eq!(handle.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn upload_continues_past_a_failing_record() {
        let dir = tempfile::tempdir().unwrap();
        let (base, _handle) = serve(vec![
            http_response("422 Unprocessable Entity", r#"{"error":"bad"}"#),
            http_response("201 Created", "{}"),
        ])
        .await;
        let client = ApiClient::new(ApiConfig::new(&base)).unwrap();
        let records = vec![record("First Person", "a"), record("Second Person", "b")];
        let tally = client.upload_team(&records, dir.path(), "tok").await;
        assert_eq!(tally.ok, 1);
        assert_eq!(tally.failed, 1);
    }
}
