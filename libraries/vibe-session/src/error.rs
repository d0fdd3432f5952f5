//! Error types for session logic

use thiserror::Error;
use vibe_core::VibeError;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// A collaborator (backend, catalog, audio engine) failed
    #[error(transparent)]
    Core(#[from] VibeError),

    /// No viewer has been set for an operation that needs one
    #[error("No signed-in viewer")]
    NotSignedIn,

    /// Rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The track has no preview clip to play
    #[error("No preview available for track {0}")]
    NoPreview(String),

    /// No song is selected
    #[error("No song selected")]
    NothingSelected,

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

impl From<config::ConfigError> for SessionError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SessionError> for VibeError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Core(inner) => inner,
            SessionError::NotSignedIn => VibeError::NotSignedIn,
            SessionError::InvalidInput(msg) => VibeError::InvalidInput(msg),
            SessionError::NoPreview(track_id) => VibeError::not_found("preview", track_id),
            other => VibeError::Other(other.to_string()),
        }
    }
}
