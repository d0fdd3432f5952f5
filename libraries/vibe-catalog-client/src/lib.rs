//! VibeCheck Catalog Client
//!
//! HTTP clients for the third-party music catalog and the preview-URL proxy.
//!
//! # Features
//!
//! - **Authentication**: client-credential token exchange, refreshed on expiry
//!   and once on a 401
//! - **Search**: track search deduplicated by (name, artist)
//! - **Previews**: preview URL lookup through the proxy, cached per track
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vibe_catalog_client::{CatalogClient, CatalogConfig, PreviewProxyClient, PreviewResolver};
//! use vibe_core::TrackCatalog;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = CatalogClient::new(CatalogConfig::new("client-id", "client-secret"))?;
//!     let tracks = catalog.search_tracks("Blinding Lights").await?;
//!
//!     let proxy = PreviewProxyClient::new("http://localhost:3000")?;
//!     let resolver = PreviewResolver::new(Arc::new(proxy), 256);
//!     let preview = resolver.resolve(&tracks[0].track_id).await?;
//!     println!("{:?}", preview);
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod error;
mod preview;
mod types;

pub use auth::TokenClient;
pub use catalog::CatalogClient;
pub use error::{CatalogError, Result};
pub use preview::{PreviewProxyClient, PreviewResolver, NO_PREVIEW_MESSAGE};
pub use types::{
    AccessToken, CatalogConfig, PreviewLookupResponse, PreviewResult, SearchResponse, TokenResponse,
};

use std::time::Duration;

/// Shared HTTP client with the timeouts every catalog call uses
pub(crate) fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("VibeCheck/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(CatalogError::Request)
}

/// Trim and validate a base URL
pub(crate) fn normalize_base_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = raw.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CatalogError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    url::Url::parse(&url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
    Ok(url)
}
