//! Feed pager
//!
//! Loads the following-based feed in pages of posts by the viewer and
//! everyone they follow, newest first.
//!
//! # Concurrency
//!
//! - `load_more` only starts from [`PagerPhase::Idle`]; overlapping calls
//!   return [`LoadOutcome::Skipped`] without touching the backend.
//! - `load_initial` and `refresh` are never dropped. Each bumps a generation
//!   counter, and any page that arrives for an older generation is discarded.

use crate::error::{Result, SessionError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};
use vibe_core::{FeedQuery, Post, PostId, SocialBackend, UserId};

/// Posts per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fraction of the visible length from the end at which more posts load
pub const DEFAULT_END_REACHED_THRESHOLD: f32 = 0.1;

/// What the pager is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerPhase {
    /// Nothing in flight
    Idle,
    /// Initial page loading
    Loading,
    /// Next page loading
    LoadingMore,
    /// First page reloading
    Refreshing,
}

/// Result of a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page applied; number of posts it held
    Loaded(usize),
    /// Another load was in flight or nothing is loaded yet
    Skipped,
    /// A refresh started while this page was loading; the page was dropped
    Discarded,
}

#[derive(Debug)]
struct PagerState {
    viewer: Option<UserId>,
    posts: Vec<Post>,
    cursor: Option<PostId>,
    bookmark: Option<PostId>,
    phase: PagerPhase,
    generation: u64,
}

/// Paged feed state for one viewer
pub struct FeedPager {
    backend: Arc<dyn SocialBackend>,
    page_size: usize,
    end_reached_threshold: f32,
    state: Mutex<PagerState>,
}

impl FeedPager {
    pub fn new(backend: Arc<dyn SocialBackend>) -> Self {
        Self::with_settings(backend, DEFAULT_PAGE_SIZE, DEFAULT_END_REACHED_THRESHOLD)
    }

    /// Pager with a custom page size and end-reached threshold.
    pub fn with_settings(
        backend: Arc<dyn SocialBackend>,
        page_size: usize,
        end_reached_threshold: f32,
    ) -> Self {
        Self {
            backend,
            page_size: page_size.max(1),
            end_reached_threshold,
            state: Mutex::new(PagerState {
                viewer: None,
                posts: Vec::new(),
                cursor: None,
                bookmark: None,
                phase: PagerPhase::Idle,
                generation: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PagerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Loaded posts, newest first.
    pub fn posts(&self) -> Vec<Post> {
        self.state().posts.clone()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.state().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().posts.is_empty()
    }

    pub fn phase(&self) -> PagerPhase {
        self.state().phase
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.state().viewer.clone()
    }

    /// Id of the last loaded post.
    pub fn cursor(&self) -> Option<PostId> {
        self.state().cursor
    }

    /// Last post that was dominant on screen.
    pub fn bookmark(&self) -> Option<PostId> {
        self.state().bookmark
    }

    pub fn set_bookmark(&self, post_id: PostId) {
        self.state().bookmark = Some(post_id);
    }

    /// Whether a scroll position is close enough to the end to load more.
    ///
    /// `distance_from_end` and `visible_length` share a unit (pixels, rows).
    pub fn should_load_more(&self, distance_from_end: f32, visible_length: f32) -> bool {
        visible_length > 0.0
            && distance_from_end <= visible_length * self.end_reached_threshold
            && self.phase() == PagerPhase::Idle
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Set the acting viewer and load their first page.
    ///
    /// Setting the same viewer again is [`LoadOutcome::Skipped`].
    pub async fn set_viewer(&self, viewer: UserId) -> Result<LoadOutcome> {
        {
            let mut state = self.state();
            if state.viewer.as_ref() == Some(&viewer) {
                return Ok(LoadOutcome::Skipped);
            }
            info!(viewer = %viewer, "Feed viewer changed");
            state.viewer = Some(viewer);
            state.posts.clear();
            state.cursor = None;
            state.bookmark = None;
        }
        self.load_initial().await
    }

    /// Load the first page, replacing the list.
    pub async fn load_initial(&self) -> Result<LoadOutcome> {
        self.reload(PagerPhase::Loading).await
    }

    /// Reload the first page, replacing the list and resetting the cursor.
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.reload(PagerPhase::Refreshing).await
    }

    /// Append the next page after the cursor.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let (viewer, cursor, generation) = {
            let mut state = self.state();
            if state.phase != PagerPhase::Idle {
                debug!(phase = ?state.phase, "Load more skipped, load in flight");
                return Ok(LoadOutcome::Skipped);
            }
            let (Some(viewer), Some(cursor)) = (state.viewer.clone(), state.cursor) else {
                return Ok(LoadOutcome::Skipped);
            };
            state.phase = PagerPhase::LoadingMore;
            (viewer, cursor, state.generation)
        };

        let result = self.fetch_page(&viewer, Some(cursor)).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!(cursor = %cursor, "Discarding page from before refresh");
            return Ok(LoadOutcome::Discarded);
        }
        state.phase = PagerPhase::Idle;

        match result {
            Ok(page) => {
                let count = page.len();
                if let Some(last) = page.last() {
                    state.cursor = Some(last.id);
                }
                state.posts.extend(page);
                debug!(count, total = state.posts.len(), "Appended feed page");
                Ok(LoadOutcome::Loaded(count))
            }
            Err(e) => {
                error!(cursor = %cursor, error = %e, "Failed to load more posts");
                Err(e)
            }
        }
    }

    async fn reload(&self, phase: PagerPhase) -> Result<LoadOutcome> {
        let (viewer, generation) = {
            let mut state = self.state();
            let viewer = state.viewer.clone().ok_or(SessionError::NotSignedIn)?;
            state.generation += 1;
            state.phase = phase;
            (viewer, state.generation)
        };

        let result = self.fetch_page(&viewer, None).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!(?phase, "Discarding superseded first page");
            return Ok(LoadOutcome::Discarded);
        }
        state.phase = PagerPhase::Idle;

        match result {
            Ok(page) => {
                let count = page.len();
                state.cursor = page.last().map(|post| post.id);
                state.posts = page;
                info!(viewer = %viewer, count, ?phase, "Feed loaded");
                Ok(LoadOutcome::Loaded(count))
            }
            Err(e) => {
                error!(viewer = %viewer, ?phase, error = %e, "Failed to load feed");
                Err(e)
            }
        }
    }

    async fn fetch_page(&self, viewer: &UserId, before: Option<PostId>) -> Result<Vec<Post>> {
        let following = self.backend.following_ids(viewer).await?;
        let authors = FeedQuery::feed_authors(viewer, following);

        let mut query = FeedQuery::new(authors, self.page_size);
        if let Some(cursor) = before {
            query = query.before(cursor);
        }

        Ok(self.backend.fetch_posts(&query).await?)
    }
}
