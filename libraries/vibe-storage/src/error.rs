/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Input rejected before touching the database
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unique constraint hit (e.g. a taken username)
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Map unique-constraint violations to `Duplicate`, keep everything else
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Duplicate(what.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<StorageError> for vibe_core::VibeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => vibe_core::VibeError::not_found(entity, id),
            StorageError::InvalidInput(msg) => vibe_core::VibeError::InvalidInput(msg),
            StorageError::Duplicate(msg) => vibe_core::VibeError::Duplicate(msg),
            other => vibe_core::VibeError::storage(other.to_string()),
        }
    }
}
