/// Shared application state
use crate::finder::PreviewFinder;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<dyn PreviewFinder>,
}

impl AppState {
    pub fn new(finder: Arc<dyn PreviewFinder>) -> Self {
        Self { finder }
    }
}
