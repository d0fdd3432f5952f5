/// Preview lookup API routes
use crate::{
    error::{ProxyError, Result},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use vibe_catalog_client::PreviewLookupResponse;

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(rename = "trackID")]
    pub track_id: Option<String>,
}

/// GET /get-song-preview?trackID=<id> - Preview clip URLs for a catalog track
pub async fn get_song_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewLookupResponse>> {
    let track_id = query
        .track_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProxyError::BadRequest("Track ID is required".to_string()))?;

    let results = state.finder.find(track_id).await?;

    if results.iter().all(|r| r.preview_urls.is_empty()) {
        return Err(ProxyError::NoPreview(track_id.to_string()));
    }

    tracing::debug!(track_id = %track_id, results = results.len(), "Preview found");

    Ok(Json(PreviewLookupResponse {
        success: true,
        results,
        error: None,
    }))
}
