/// Traits for the music catalog collaborators
use crate::error::Result;
use crate::types::CatalogTrack;
use async_trait::async_trait;

/// Third-party music catalog search
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Search tracks by free text
    ///
    /// Implementations return results deduplicated by (name, artist), in
    /// catalog relevance order.
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>>;
}

/// Source of preview clip URLs for catalog tracks
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// All preview URLs known for a track, best first
    ///
    /// An empty list means the track has no preview.
    async fn preview_urls(&self, track_id: &str) -> Result<Vec<String>>;
}
