//! Preview clip lookup
//!
//! The catalog no longer returns preview URLs from its API, but the public
//! track embed page still references them. [`EmbedPreviewFinder`] fetches
//! that page and pulls the clip URLs out of it.

use crate::error::{ProxyError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;
use vibe_catalog_client::PreviewResult;

/// Base URL of public track pages
pub const DEFAULT_PAGE_BASE_URL: &str = "https://open.spotify.com";

/// Preview clip host
const PREVIEW_BASE: &str = "https://p.scdn.co/mp3-preview/";

/// Matches preview URLs in plain or JSON-escaped form and captures the clip id
static PREVIEW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https:(?:\\?/){2}p\.scdn\.co\\?/mp3-preview\\?/([A-Za-z0-9]+)")
        .expect("Invalid preview regex")
});

/// Matches the page's `og:title` meta tag
static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+property="og:title"[^>]+content="([^"]*)""#)
        .expect("Invalid title regex")
});

/// Finds preview clip URLs for a catalog track
#[async_trait]
pub trait PreviewFinder: Send + Sync {
    /// Matches for the track; an empty `preview_urls` means no clip exists
    async fn find(&self, track_id: &str) -> Result<Vec<PreviewResult>>;
}

/// Scrapes preview URLs from the track's public embed page
pub struct EmbedPreviewFinder {
    http: Client,
    page_base_url: Url,
}

impl EmbedPreviewFinder {
    pub fn new(page_base_url: &str, timeout: Duration) -> Result<Self> {
        let page_base_url = Url::parse(page_base_url)
            .map_err(|e| ProxyError::Config(format!("Invalid page base URL: {}", e)))?;
        if page_base_url.cannot_be_a_base() {
            return Err(ProxyError::Config(format!(
                "Page base URL cannot be a base: {}",
                page_base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("VibeCheck-Preview-Proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            page_base_url,
        })
    }

    /// Embed page URL for a track; the id is percent-encoded as one path segment.
    pub fn embed_url(&self, track_id: &str) -> Url {
        let mut url = self.page_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["embed", "track", track_id]);
        }
        url
    }

    /// Canonical web URL for a track.
    pub fn track_url(&self, track_id: &str) -> Url {
        let mut url = self.page_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["track", track_id]);
        }
        url
    }
}

#[async_trait]
impl PreviewFinder for EmbedPreviewFinder {
    async fn find(&self, track_id: &str) -> Result<Vec<PreviewResult>> {
        let url = self.embed_url(track_id);
        tracing::debug!(url = %url, "Fetching embed page");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(ProxyError::NoPreview(track_id.to_string()));
        }
        if !status.is_success() {
            return Err(ProxyError::Upstream(format!(
                "Embed page returned {} for track {}",
                status, track_id
            )));
        }

        let page = response.text().await?;

        Ok(vec![PreviewResult {
            name: extract_title(&page).unwrap_or_default(),
            spotify_url: self.track_url(track_id).to_string(),
            preview_urls: extract_preview_urls(&page),
        }])
    }
}

/// Preview URLs in page order, without repeats.
pub fn extract_preview_urls(page: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PREVIEW_REGEX
        .captures_iter(page)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .filter(|id| seen.insert(*id))
        .map(|id| format!("{}{}", PREVIEW_BASE, id))
        .collect()
}

/// Track title from the page's `og:title` tag.
pub fn extract_title(page: &str) -> Option<String> {
    TITLE_REGEX
        .captures(page)
        .and_then(|cap| cap.get(1))
        .map(|m| decode_entities(m.as_str()))
        .filter(|title| !title.is_empty())
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
