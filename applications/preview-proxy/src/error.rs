/// Proxy error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    BadRequest(String),

    #[error("No preview found for track {0}")]
    NoPreview(String),

    #[error("Preview lookup failed: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<config::ConfigError> for ProxyError {
    fn from(err: config::ConfigError) -> Self {
        ProxyError::Config(err.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::NoPreview(ref track_id) => {
                tracing::info!(track_id = %track_id, "No preview available");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Upstream(ref msg) => {
                tracing::error!("Upstream error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Http(ref e) => {
                tracing::error!("HTTP error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
