//! VibeCheck preview proxy
//!
//! Small HTTP service that resolves 30-second preview clip URLs for catalog
//! tracks. Clients call `GET /get-song-preview?trackID=<id>` and receive the
//! clip URLs found on the track's public embed page.
//!
//! This library exposes the router and components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod finder;
pub mod state;

use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

// Re-export commonly used types for convenience
pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use finder::{EmbedPreviewFinder, PreviewFinder};
pub use state::AppState;

/// Build the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/get-song-preview", get(api::preview::get_song_preview))
        .route("/health", get(api::health::health))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
