use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Origin used to resolve image URLs that come without a scheme.
const SITE_ORIGIN: &str = "https://bancat.org.bd";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// The origin rejects unidentified clients.
const USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_EXT: &str = ".jpg";

/// Downloads record images into a flat content directory, keyed by a
/// filename derived from the record's display name. Repeat runs are
/// cheap: an existing file suppresses the fetch entirely.
pub struct ImageFetcher {
    client: reqwest::Client,
    dir: PathBuf,
    origin: String,
}

impl ImageFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_origin(dir, SITE_ORIGIN)
    }

    pub fn with_origin(dir: impl Into<PathBuf>, origin: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            dir: dir.into(),
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch `url` and store it under a name derived from `logical_name`.
    /// Returns the stored filename, or an empty string when there is no
    /// image to fetch or the fetch failed. Never returns an error: a
    /// missing photo degrades the record, it does not abort the run.
    pub async fn fetch(&self, url: &str, logical_name: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        let resolved = self.resolve(url);
        let filename = derive_filename(logical_name, &resolved);
        let path = self.dir.join(&filename);

        if path.exists() {
            debug!("Already fetched, skipping: {}", filename);
            return filename;
        }

        match self.download(&resolved, &path).await {
            Ok(()) => {
                info!("Downloaded: {}", filename);
                filename
            }
            Err(e) => {
                warn!("Failed to download {}: {}", resolved, e);
                String::new()
            }
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            format!("{}/{}", self.origin, url)
        }
    }

    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {}", status);
        }
        let body = response.bytes().await?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, &body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Filesystem-safe filename: lowercased name with spaces replaced and
/// periods stripped, plus the URL path's extension (`.jpg` fallback).
pub fn derive_filename(logical_name: &str, url: &str) -> String {
    let stem = logical_name
        .to_lowercase()
        .replace(' ', "_")
        .replace('.', "");
    let ext = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
        })
        .unwrap_or_else(|| DEFAULT_EXT.to_string());
    format!("{}{}", stem, ext)
}

// ── Tests ──
