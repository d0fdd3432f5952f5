//! Feed screen session
//!
//! Wires visibility reports to the pager bookmark and the audio controller.
//! Playback is spawned so scroll handling never waits on audio loading.

use crate::audio::{PlayOutcome, SessionAudioController};
use crate::error::Result;
use crate::pager::{FeedPager, LoadOutcome};
use crate::viewability::{ViewabilityChange, ViewabilityTracker, VisibleItem};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Feed screen state: pager, dominant-post tracking, and playback
pub struct FeedSession {
    pager: Arc<FeedPager>,
    audio: Arc<SessionAudioController>,
    tracker: Mutex<ViewabilityTracker>,
}

impl FeedSession {
    pub fn new(
        pager: Arc<FeedPager>,
        audio: Arc<SessionAudioController>,
        tracker: ViewabilityTracker,
    ) -> Self {
        Self {
            pager,
            audio,
            tracker: Mutex::new(tracker),
        }
    }

    pub fn pager(&self) -> &Arc<FeedPager> {
        &self.pager
    }

    pub fn audio(&self) -> &Arc<SessionAudioController> {
        &self.audio
    }

    /// Handle a visibility report from the host list.
    ///
    /// Returns the spawned playback task when the dominant post changed.
    pub fn on_viewable_items_changed(
        &self,
        items: &[VisibleItem<'_>],
    ) -> Option<JoinHandle<Result<PlayOutcome>>> {
        let change = self
            .tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .observe(items);

        match change {
            ViewabilityChange::Unchanged => None,
            ViewabilityChange::Play {
                post_id,
                track_id,
                url,
            } => {
                debug!(post_id = %post_id, "Dominant post changed");
                self.pager.set_bookmark(post_id);
                let audio = Arc::clone(&self.audio);
                Some(tokio::spawn(async move {
                    audio.play(&url, &track_id).await
                }))
            }
            ViewabilityChange::Stop { post_id } => {
                debug!(post_id = %post_id, "Dominant post has no preview");
                self.pager.set_bookmark(post_id);
                let audio = Arc::clone(&self.audio);
                Some(tokio::spawn(async move {
                    audio.stop().await;
                    Ok(PlayOutcome::Stopped)
                }))
            }
        }
    }

    /// Load the next page if the scroll position is near the end.
    pub async fn on_end_reached(
        &self,
        distance_from_end: f32,
        visible_length: f32,
    ) -> Result<LoadOutcome> {
        if !self
            .pager
            .should_load_more(distance_from_end, visible_length)
        {
            return Ok(LoadOutcome::Skipped);
        }
        self.pager.load_more().await
    }

    /// Pull-to-refresh. The top post plays again once reported visible.
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.reset_tracker();
        self.pager.refresh().await
    }

    /// The feed screen lost focus: stop playback.
    pub async fn unfocus(&self) {
        self.audio.unfocus().await;
        self.reset_tracker();
    }

    fn reset_tracker(&self) {
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .reset();
    }
}
