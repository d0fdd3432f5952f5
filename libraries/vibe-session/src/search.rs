//! Song search for composing a post
//!
//! Queries are debounced: each call waits out the debounce window and only
//! the most recent query reaches the catalog. A response that arrives after
//! a newer query was typed is dropped.

use crate::audio::{PlayOutcome, SessionAudioController};
use crate::error::{Result, SessionError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};
use vibe_catalog_client::PreviewResolver;
use vibe_core::{CatalogTrack, NewPost, Post, SocialBackend, TrackCatalog, UserId};

/// Default debounce window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// Result of a search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results for the latest query
    Results(Vec<CatalogTrack>),
    /// A newer query replaced this one
    Superseded,
}

/// Search screen state
pub struct SongSearch {
    catalog: Arc<dyn TrackCatalog>,
    previews: Arc<PreviewResolver>,
    audio: Arc<SessionAudioController>,
    debounce: Duration,
    latest: AtomicU64,
    selected: Mutex<Option<CatalogTrack>>,
}

impl SongSearch {
    pub fn new(
        catalog: Arc<dyn TrackCatalog>,
        previews: Arc<PreviewResolver>,
        audio: Arc<SessionAudioController>,
        debounce: Duration,
    ) -> Self {
        Self {
            catalog,
            previews,
            audio,
            debounce,
            latest: AtomicU64::new(0),
            selected: Mutex::new(None),
        }
    }

    fn selection(&self) -> MutexGuard<'_, Option<CatalogTrack>> {
        self.selected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Search after the debounce window. Blank text clears results at once.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() {
            return Ok(SearchOutcome::Results(Vec::new()));
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(ticket) {
            return Ok(SearchOutcome::Superseded);
        }

        let tracks = self.catalog.search_tracks(query).await?;
        if !self.is_latest(ticket) {
            debug!(query = %query, "Dropping results for a replaced query");
            return Ok(SearchOutcome::Superseded);
        }

        debug!(query = %query, results = tracks.len(), "Search results ready");
        Ok(SearchOutcome::Results(tracks))
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Select a track for posting, resolving its preview URL.
    pub async fn select(&self, mut track: CatalogTrack) -> Result<CatalogTrack> {
        if track.preview_url.is_none() {
            track.preview_url = self.previews.resolve(&track.track_id).await?;
        }
        *self.selection() = Some(track.clone());
        Ok(track)
    }

    pub fn selected(&self) -> Option<CatalogTrack> {
        self.selection().clone()
    }

    pub fn clear_selection(&self) {
        *self.selection() = None;
    }

    /// Toggle the preview clip of a track.
    pub async fn preview(&self, track: &CatalogTrack) -> Result<PlayOutcome> {
        let url = match &track.preview_url {
            Some(url) => Some(url.clone()),
            None => self.previews.resolve(&track.track_id).await?,
        };
        let url = url.ok_or_else(|| SessionError::NoPreview(track.track_id.clone()))?;
        self.audio.toggle(&url, &track.track_id).await
    }

    /// Post the selected track and stop its preview.
    pub async fn share_selected(
        &self,
        backend: &dyn SocialBackend,
        author: &UserId,
        caption: &str,
    ) -> Result<Post> {
        let track = self.selected().ok_or(SessionError::NothingSelected)?;
        let post = backend
            .create_post(NewPost {
                author_id: author.clone(),
                song: track.into_song(),
                caption: caption.trim().to_string(),
            })
            .await?;

        self.audio.stop().await;
        self.clear_selection();
        info!(post_id = %post.id, author = %author, "Song posted");
        Ok(post)
    }
}
