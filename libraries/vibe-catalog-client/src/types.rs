//! Types for catalog and preview proxy requests and responses.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default catalog API base URL
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";
/// Default token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
/// Market used for search results
pub const DEFAULT_MARKET: &str = "ES";
/// Results kept per search
pub const DEFAULT_RESULT_LIMIT: usize = 20;

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API base URL (search lives at `{api_url}/v1/search`)
    pub api_url: String,
    /// Client-credential token endpoint
    pub token_url: String,
    /// Application client id
    pub client_id: String,
    /// Application client secret
    pub client_secret: String,
    /// Market (country code) for search
    pub market: String,
    /// Maximum number of raw results inspected per search
    pub result_limit: usize,
}

impl CatalogConfig {
    /// Config against the public catalog endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            market: DEFAULT_MARKET.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Point the client at other endpoints (mock servers, regional gateways).
    #[must_use]
    pub fn with_urls(mut self, api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.token_url = token_url.into();
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Response from the client-credential token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Token validity in seconds
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// A bearer token with its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AccessToken {
    /// Safety margin before expiry at which the token is treated as stale
    const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

    /// Build from a token response received now.
    pub fn from_response(response: TokenResponse) -> Self {
        Self {
            value: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        }
    }

    /// Whether the token should be refreshed before use.
    pub fn is_expired(&self) -> bool {
        Instant::now() + Self::EXPIRY_MARGIN >= self.expires_at
    }
}

// =============================================================================
// Search Types
// =============================================================================

/// Track search response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
}

/// Page of track results.
#[derive(Debug, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackItem>,
}

/// One track in a search page.
#[derive(Debug, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
}

/// Artist reference on a track.
#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

/// Album reference on a track.
#[derive(Debug, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// Album image, largest first.
#[derive(Debug, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

// =============================================================================
// Preview Proxy Types
// =============================================================================

/// Body returned by `GET /get-song-preview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviewLookupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<PreviewResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One match from the preview finder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spotify_url: String,
    #[serde(default)]
    pub preview_urls: Vec<String>,
}
