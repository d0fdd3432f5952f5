//! Session events
//!
//! Broadcast to UI observers so play/pause iconography follows the
//! controller instead of guessing.

use serde::{Deserialize, Serialize};

/// Events emitted by the session audio controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A clip started playing
    PlaybackStarted {
        /// Track now playing
        track_id: String,
        /// Request that produced it
        request_id: u64,
    },

    /// The playing clip stopped
    PlaybackStopped {
        /// Track that was playing
        track_id: String,
        /// Why it stopped
        reason: StopReason,
    },

    /// Acquiring a clip failed; nothing is playing
    PlaybackFailed {
        /// Track that was requested
        track_id: String,
        /// Error message
        message: String,
    },
}

/// Why playback stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Another clip was requested
    Replaced,
    /// Explicit stop
    Stopped,
    /// Reached the end of the clip
    Finished,
    /// The screen lost focus
    Unfocused,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = SessionEvent::PlaybackStopped {
            track_id: "t1".to_string(),
            reason: StopReason::Unfocused,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "playback_stopped");
        assert_eq!(json["reason"], "unfocused");
    }
}
