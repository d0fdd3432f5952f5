//! Session audio controller
//!
//! Owns the single preview clip allowed to play at a time. Every `play` and
//! `stop` takes a new request id; when an acquisition resolves, its handle is
//! kept only if no newer request was issued in the meantime. A late handle is
//! released on arrival, so two overlapping `play` calls always end with the
//! second clip and exactly one live handle.

use crate::engine::{AudioEngine, AudioHandle, FinishNotifier, LoadRequest};
use crate::error::Result;
use crate::events::{SessionEvent, StopReason};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default capacity of the event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 32;

/// Track currently playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    /// Track identifier supplied to `play`
    pub track_id: String,
    /// Preview URL being played
    pub url: String,
    /// Request that started it
    pub request_id: u64,
}

/// Result of a playback request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The clip is now playing
    Started,
    /// A newer request won; the acquired handle was released
    Superseded,
    /// `toggle` stopped the clip that was playing
    Stopped,
}

#[derive(Default)]
struct Slot {
    handle: Option<Box<dyn AudioHandle>>,
    now_playing: Option<NowPlaying>,
}

/// Single-handle playback controller shared by the feed and search screens
pub struct SessionAudioController {
    engine: Arc<dyn AudioEngine>,
    sequence: AtomicU64,
    slot: Mutex<Slot>,
    events: broadcast::Sender<SessionEvent>,
    finished_tx: mpsc::UnboundedSender<u64>,
    finished_rx: std::sync::Mutex<Option<mpsc::UnboundedReceiver<u64>>>,
}

impl SessionAudioController {
    /// Create a controller over the platform engine.
    pub fn new(engine: Arc<dyn AudioEngine>) -> Self {
        Self::with_event_capacity(engine, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a controller with a custom event buffer size.
    pub fn with_event_capacity(engine: Arc<dyn AudioEngine>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            sequence: AtomicU64::new(0),
            slot: Mutex::new(Slot::default()),
            events,
            finished_tx,
            finished_rx: std::sync::Mutex::new(Some(finished_rx)),
        }
    }

    /// Subscribe to playback events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Track currently playing, if any.
    pub async fn now_playing(&self) -> Option<NowPlaying> {
        self.slot.lock().await.now_playing.clone()
    }

    /// Whether a handle is held (playing, or finished and not yet released).
    pub async fn holds_handle(&self) -> bool {
        self.slot.lock().await.handle.is_some()
    }

    /// Play a preview clip, replacing whatever was playing.
    ///
    /// Returns [`PlayOutcome::Superseded`] when a newer `play` or `stop`
    /// was issued before this clip was ready.
    pub async fn play(&self, url: &str, track_id: &str) -> Result<PlayOutcome> {
        let request_id = self.next_request_id();

        {
            let mut slot = self.slot.lock().await;
            self.release_slot(&mut slot, StopReason::Replaced).await;
        }

        debug!(request_id, track_id = %track_id, "Loading preview");
        let request = LoadRequest {
            request_id,
            url: url.to_string(),
            autoplay: true,
            finished: FinishNotifier::new(request_id, self.finished_tx.clone()),
        };
        let loaded = self.engine.load(request).await;

        let mut slot = self.slot.lock().await;

        if self.sequence.load(Ordering::SeqCst) != request_id {
            if let Ok(mut handle) = loaded {
                if let Err(e) = handle.release().await {
                    warn!(request_id, error = %e, "Failed to release superseded handle");
                }
            }
            debug!(request_id, track_id = %track_id, "Play request superseded");
            return Ok(PlayOutcome::Superseded);
        }

        match loaded {
            Ok(handle) => {
                self.release_slot(&mut slot, StopReason::Replaced).await;
                slot.handle = Some(handle);
                slot.now_playing = Some(NowPlaying {
                    track_id: track_id.to_string(),
                    url: url.to_string(),
                    request_id,
                });
                drop(slot);

                info!(request_id, track_id = %track_id, "Preview playing");
                self.emit(SessionEvent::PlaybackStarted {
                    track_id: track_id.to_string(),
                    request_id,
                });
                Ok(PlayOutcome::Started)
            }
            Err(e) => {
                drop(slot);
                warn!(request_id, track_id = %track_id, error = %e, "Failed to load preview");
                self.emit(SessionEvent::PlaybackFailed {
                    track_id: track_id.to_string(),
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Stop playback. No-op when nothing is held.
    pub async fn stop(&self) {
        self.halt(StopReason::Stopped).await;
    }

    /// Stop playback because the screen lost focus.
    pub async fn unfocus(&self) {
        self.halt(StopReason::Unfocused).await;
    }

    /// Stop `track_id` if it is the one playing, otherwise play it.
    pub async fn toggle(&self, url: &str, track_id: &str) -> Result<PlayOutcome> {
        let playing = self
            .now_playing()
            .await
            .is_some_and(|now| now.track_id == track_id);

        if playing {
            self.stop().await;
            Ok(PlayOutcome::Stopped)
        } else {
            self.play(url, track_id).await
        }
    }

    /// Handle a natural-end report from the engine.
    ///
    /// The handle stays parked until the next play, stop, or unfocus
    /// releases it. Reports for anything but the current clip are ignored.
    pub async fn on_track_finished(&self, request_id: u64) {
        let mut slot = self.slot.lock().await;

        let current = slot
            .now_playing
            .as_ref()
            .is_some_and(|now| now.request_id == request_id);
        if !current {
            debug!(request_id, "Ignoring stale completion");
            return;
        }

        if let Some(now) = slot.now_playing.take() {
            drop(slot);
            debug!(request_id, track_id = %now.track_id, "Preview finished");
            self.emit(SessionEvent::PlaybackStopped {
                track_id: now.track_id,
                reason: StopReason::Finished,
            });
        }
    }

    /// Spawn the task that forwards engine completions to the controller.
    ///
    /// Returns `None` if the listener was already started.
    pub fn spawn_completion_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut rx = self
            .finished_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()?;
        let controller: Weak<Self> = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            while let Some(request_id) = rx.recv().await {
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.on_track_finished(request_id).await;
            }
        }))
    }

    async fn halt(&self, reason: StopReason) {
        // Invalidates any acquisition still in flight.
        self.next_request_id();

        let mut slot = self.slot.lock().await;
        self.release_slot(&mut slot, reason).await;
    }

    async fn release_slot(&self, slot: &mut Slot, reason: StopReason) {
        if let Some(mut handle) = slot.handle.take() {
            if let Err(e) = handle.release().await {
                warn!(error = %e, "Failed to release audio handle");
            }
        }

        if let Some(now) = slot.now_playing.take() {
            debug!(track_id = %now.track_id, ?reason, "Preview stopped");
            self.emit(SessionEvent::PlaybackStopped {
                track_id: now.track_id,
                reason,
            });
        }
    }

    fn next_request_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
