//! Audio engine seam
//!
//! The host platform owns actual decoding and output. The session only needs
//! to acquire a playable resource for a URL, release it, and hear back when
//! a clip reaches its natural end.

use async_trait::async_trait;
use tokio::sync::mpsc;
use vibe_core::Result;

/// Reports natural end of playback for one load request
///
/// Engines call [`FinishNotifier::notify`] once when the clip ends on its
/// own. Releasing a handle must not trigger it.
#[derive(Debug, Clone)]
pub struct FinishNotifier {
    request_id: u64,
    tx: mpsc::UnboundedSender<u64>,
}

impl FinishNotifier {
    pub(crate) fn new(request_id: u64, tx: mpsc::UnboundedSender<u64>) -> Self {
        Self { request_id, tx }
    }

    /// Request this notifier belongs to
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Signal that playback finished naturally
    pub fn notify(&self) {
        // The controller may already be gone; nothing left to tell.
        let _ = self.tx.send(self.request_id);
    }
}

/// Everything an engine needs to start one clip
#[derive(Debug)]
pub struct LoadRequest {
    /// Monotonic id assigned by the controller
    pub request_id: u64,
    /// Remote preview URL
    pub url: String,
    /// Start playing as soon as the resource is ready
    pub autoplay: bool,
    /// Completion callback
    pub finished: FinishNotifier,
}

/// Platform audio engine
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Acquire a playback resource for the request
    async fn load(&self, request: LoadRequest) -> Result<Box<dyn AudioHandle>>;
}

/// A live playback resource
#[async_trait]
pub trait AudioHandle: Send {
    /// Stop output and free the resource
    async fn release(&mut self) -> Result<()>;
}
