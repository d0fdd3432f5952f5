//! Preview URL lookup through the proxy, with a per-track cache.

use crate::error::{CatalogError, Result};
use crate::types::PreviewLookupResponse;
use crate::{build_http_client, normalize_base_url};
use async_trait::async_trait;
use lru::LruCache;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::debug;
use vibe_core::PreviewSource;

/// Error prefix the proxy uses when a track has no preview clip
pub const NO_PREVIEW_MESSAGE: &str = "No preview found";

/// Client for the preview proxy's `GET /get-song-preview` endpoint.
pub struct PreviewProxyClient {
    http: Client,
    base_url: String,
}

impl PreviewProxyClient {
    /// Create a client for the proxy at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: build_http_client()?,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Proxy base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up preview URLs for a catalog track id.
    pub async fn lookup(&self, track_id: &str) -> Result<PreviewLookupResponse> {
        let url = format!("{}/get-song-preview", self.base_url);
        debug!(url = %url, track_id = %track_id, "Looking up song preview");

        let response = self
            .http
            .get(&url)
            .query(&[("trackID", track_id)])
            .send()
            .await
            .map_err(CatalogError::from_send)?;

        let status = response.status();
        let text = response.text().await.map_err(CatalogError::Request)?;

        if !status.is_success() {
            let message = serde_json::from_str::<PreviewLookupResponse>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or(text);
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body: PreviewLookupResponse = serde_json::from_str(&text).map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse preview response: {}", e))
        })?;

        if body.success {
            Ok(body)
        } else {
            Err(CatalogError::ServerError {
                status: status.as_u16(),
                message: body
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

/// Whether an error is the proxy reporting that the track has no clip.
fn is_no_preview(err: &CatalogError) -> bool {
    matches!(
        err,
        CatalogError::ServerError { status: 500, message } if message.starts_with(NO_PREVIEW_MESSAGE)
    )
}

#[async_trait]
impl PreviewSource for PreviewProxyClient {
    async fn preview_urls(&self, track_id: &str) -> vibe_core::Result<Vec<String>> {
        let response = match self.lookup(track_id).await {
            Ok(response) => response,
            Err(e) if is_no_preview(&e) => {
                debug!(track_id = %track_id, "Proxy has no preview for track");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| r.preview_urls)
            .unwrap_or_default())
    }
}

/// Lazily resolves and caches one preview URL per track.
///
/// A track with no preview is cached as `None` so it is not looked up again.
pub struct PreviewResolver {
    source: Arc<dyn PreviewSource>,
    cache: Mutex<LruCache<String, Option<String>>>,
}

impl PreviewResolver {
    /// Default number of tracks remembered
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a resolver remembering up to `capacity` tracks.
    pub fn new(source: Arc<dyn PreviewSource>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Preview URL for a track, looked up on first request.
    pub async fn resolve(&self, track_id: &str) -> vibe_core::Result<Option<String>> {
        if let Some(cached) = self.cached(track_id) {
            return Ok(cached);
        }

        let url = self.source.preview_urls(track_id).await?.into_iter().next();

        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .put(track_id.to_string(), url.clone());

        debug!(track_id = %track_id, found = url.is_some(), "Resolved preview URL");
        Ok(url)
    }

    /// Number of tracks remembered.
    pub fn capacity(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .cap()
            .get()
    }

    /// Cached value, if the track was resolved before.
    pub fn cached(&self, track_id: &str) -> Option<Option<String>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(track_id)
            .cloned()
    }
}
