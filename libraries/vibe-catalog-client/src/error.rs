//! Error types for the catalog and preview clients.

use thiserror::Error;

/// Errors that can occur when talking to the catalog or the preview proxy.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Client-credential exchange was rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl CatalogError {
    /// Classify a transport error
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ServerUnreachable(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

impl From<CatalogError> for vibe_core::VibeError {
    fn from(err: CatalogError) -> Self {
        vibe_core::VibeError::network(err.to_string())
    }
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
