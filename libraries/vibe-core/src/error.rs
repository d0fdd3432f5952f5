/// Core error types for VibeCheck
use thiserror::Error;

/// Result type alias using `VibeError`
pub type Result<T> = std::result::Result<T, VibeError>;

/// Core error type for VibeCheck
///
/// Nothing here is fatal: every failure belongs to a single operation and is
/// recoverable by retrying the user action.
#[derive(Error, Debug)]
pub enum VibeError {
    /// Backend/storage errors (reads and writes against the social backend)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network errors talking to the catalog, the proxy, or the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Audio resource acquisition or release failed
    #[error("Audio error: {0}")]
    Audio(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity (post, user, ...)
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// No signed-in identity is available for an operation that needs one
    #[error("Not signed in")]
    NotSignedIn,

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl VibeError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for VibeError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
