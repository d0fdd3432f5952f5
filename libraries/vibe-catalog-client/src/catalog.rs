//! Music catalog search client.

use crate::auth::TokenClient;
use crate::error::{CatalogError, Result};
use crate::types::{AccessToken, CatalogConfig, SearchResponse, TrackItem};
use crate::{build_http_client, normalize_base_url};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vibe_core::types::CatalogTrack;
use vibe_core::TrackCatalog;

/// Catalog client holding the application token.
///
/// The token is fetched on first use, refreshed when it expires, and
/// refreshed once more if the catalog answers 401.
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
    token: RwLock<Option<AccessToken>>,
}

enum SearchAttempt {
    Found(SearchResponse),
    Unauthorized,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api_url = normalize_base_url(&config.api_url)?;
        let token_url = normalize_base_url(&config.token_url)?;

        Ok(Self {
            http: build_http_client()?,
            config: CatalogConfig {
                api_url,
                token_url,
                ..config
            },
            token: RwLock::new(None),
        })
    }

    /// Fetch a fresh token and store it.
    pub async fn authenticate(&self) -> Result<String> {
        let response = TokenClient::new(&self.http, &self.config.token_url)
            .exchange(&self.config.client_id, &self.config.client_secret)
            .await?;

        let token = AccessToken::from_response(response);
        let value = token.value.clone();
        *self.token.write().await = Some(token);

        info!("Catalog token acquired");
        Ok(value)
    }

    /// Current token, fetching one if missing or expired.
    async fn bearer(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if !token.is_expired() {
                return Ok(token.value.clone());
            }
        }
        self.authenticate().await
    }

    /// Search tracks, deduplicated by (name, first artist).
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.bearer().await?;
        let response = match self.search_once(query, &token).await? {
            SearchAttempt::Found(response) => response,
            SearchAttempt::Unauthorized => {
                warn!("Catalog token rejected, re-authenticating");
                let token = self.authenticate().await?;
                match self.search_once(query, &token).await? {
                    SearchAttempt::Found(response) => response,
                    SearchAttempt::Unauthorized => {
                        return Err(CatalogError::AuthFailed(
                            "Catalog rejected a fresh token".to_string(),
                        ))
                    }
                }
            }
        };

        let tracks = dedup_tracks(response.tracks.items, self.config.result_limit);
        debug!(query = %query, results = tracks.len(), "Catalog search complete");
        Ok(tracks)
    }

    async fn search_once(&self, query: &str, token: &str) -> Result<SearchAttempt> {
        let url = format!("{}/v1/search", self.config.api_url);
        let limit = self.config.result_limit.to_string();

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("market", self.config.market.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(CatalogError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let body: SearchResponse = response.json().await.map_err(|e| {
                CatalogError::ParseError(format!("Failed to parse search response: {}", e))
            })?;
            Ok(SearchAttempt::Found(body))
        } else if status.as_u16() == 401 {
            Ok(SearchAttempt::Unauthorized)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(CatalogError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

#[async_trait]
impl TrackCatalog for CatalogClient {
    async fn search_tracks(&self, query: &str) -> vibe_core::Result<Vec<CatalogTrack>> {
        Ok(self.search(query).await?)
    }
}

/// Keep the first `limit` raw items, collapsing repeats of (name, first artist).
fn dedup_tracks(items: Vec<TrackItem>, limit: usize) -> Vec<CatalogTrack> {
    let mut seen = HashSet::new();
    let mut tracks = Vec::new();

    for item in items.into_iter().take(limit) {
        let track = CatalogTrack {
            artist: item
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
            cover: item
                .album
                .images
                .into_iter()
                .next()
                .map(|i| i.url)
                .unwrap_or_default(),
            track_id: item.id,
            name: item.name,
            uri: item.uri,
            preview_url: None,
        };

        let (name, artist) = track.dedup_key();
        if seen.insert((name.to_string(), artist.to_string())) {
            tracks.push(track);
        }
    }

    tracks
}
