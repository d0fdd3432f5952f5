//! Viewability tracking
//!
//! Turns the host list's "visible items changed" reports into at most one
//! playback decision per change of dominant post.

use vibe_core::{Post, PostId};

/// Default fraction of an item that must be visible to count
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// One item reported visible by the host list, top to bottom
#[derive(Debug, Clone, Copy)]
pub struct VisibleItem<'a> {
    /// The post rendered in the row
    pub post: &'a Post,
    /// Fraction of the row on screen, 0.0 to 1.0
    pub visible_fraction: f32,
}

impl<'a> VisibleItem<'a> {
    pub fn new(post: &'a Post, visible_fraction: f32) -> Self {
        Self {
            post,
            visible_fraction,
        }
    }
}

/// What the session should do after a visibility report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewabilityChange {
    /// Same dominant post as before, or nothing visible enough
    Unchanged,
    /// A new dominant post with a preview clip
    Play {
        /// Dominant post
        post_id: PostId,
        /// Track identifier (the song URI)
        track_id: String,
        /// Preview URL
        url: String,
    },
    /// A new dominant post without a preview clip
    Stop {
        /// Dominant post
        post_id: PostId,
    },
}

/// Tracks the dominant visible post
#[derive(Debug, Clone)]
pub struct ViewabilityTracker {
    threshold: f32,
    last_dominant: Option<PostId>,
}

impl Default for ViewabilityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl ViewabilityTracker {
    /// Tracker counting items at least `threshold` visible.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            last_dominant: None,
        }
    }

    /// Visibility threshold in use.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Last dominant post.
    pub fn last_dominant(&self) -> Option<PostId> {
        self.last_dominant
    }

    /// Process a report; the topmost item at or above threshold is dominant.
    pub fn observe(&mut self, items: &[VisibleItem<'_>]) -> ViewabilityChange {
        let Some(dominant) = items
            .iter()
            .find(|item| item.visible_fraction >= self.threshold)
        else {
            return ViewabilityChange::Unchanged;
        };

        let post = dominant.post;
        if self.last_dominant == Some(post.id) {
            return ViewabilityChange::Unchanged;
        }
        self.last_dominant = Some(post.id);

        match post.preview_url() {
            Some(url) => ViewabilityChange::Play {
                post_id: post.id,
                track_id: post.song.uri.clone(),
                url: url.to_string(),
            },
            None => ViewabilityChange::Stop { post_id: post.id },
        }
    }

    /// Forget the dominant post so it plays again on the next report.
    pub fn reset(&mut self) {
        self.last_dominant = None;
    }
}
