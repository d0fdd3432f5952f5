/// Session configuration
use crate::audio::{self, SessionAudioController};
use crate::engine::AudioEngine;
use crate::error::{Result, SessionError};
use crate::pager::{self, FeedPager};
use crate::search::{self, SongSearch};
use crate::viewability::{self, ViewabilityTracker};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use vibe_catalog_client::{CatalogConfig, PreviewProxyClient, PreviewResolver};
use vibe_core::{PreviewSource, SocialBackend, TrackCatalog, VibeError};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vibe.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub feed: FeedSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub proxy: ProxySettings,

    #[serde(default)]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_viewability_threshold")]
    pub viewability_threshold: f32,

    #[serde(default = "default_end_reached_threshold")]
    pub end_reached_threshold: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_preview_cache_capacity")]
    pub preview_cache_capacity: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub market: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxySettings {
    #[serde(default = "default_proxy_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

// Defaults
fn default_page_size() -> usize {
    pager::DEFAULT_PAGE_SIZE
}

fn default_viewability_threshold() -> f32 {
    viewability::DEFAULT_VISIBILITY_THRESHOLD
}

fn default_end_reached_threshold() -> f32 {
    pager::DEFAULT_END_REACHED_THRESHOLD
}

fn default_debounce_ms() -> u64 {
    search::DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_preview_cache_capacity() -> usize {
    PreviewResolver::DEFAULT_CAPACITY
}

fn default_proxy_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_event_capacity() -> usize {
    audio::DEFAULT_EVENT_CAPACITY
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            viewability_threshold: default_viewability_threshold(),
            end_reached_threshold: default_end_reached_threshold(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            preview_cache_capacity: default_preview_cache_capacity(),
        }
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            url: default_proxy_url(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file and `VIBE__` environment overrides
    ///
    /// Without an explicit path, `vibe.toml` in the working directory is used
    /// if present. Nested keys use `__`, e.g. `VIBE__FEED__PAGE_SIZE=20`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("VIBE")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.feed.page_size == 0 {
            return Err(SessionError::Config(
                "feed.page_size must be at least 1".to_string(),
            ));
        }

        for (key, value) in [
            ("feed.viewability_threshold", self.feed.viewability_threshold),
            ("feed.end_reached_threshold", self.feed.end_reached_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SessionError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    key, value
                )));
            }
        }

        if self.proxy.url.trim().is_empty() {
            return Err(SessionError::Config("proxy.url cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Catalog client configuration built from the `catalog` section
    pub fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::new(
            self.catalog.client_id.clone(),
            self.catalog.client_secret.clone(),
        );
        if let Some(api_url) = &self.catalog.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(token_url) = &self.catalog.token_url {
            config.token_url.clone_from(token_url);
        }
        if let Some(market) = &self.catalog.market {
            config.market.clone_from(market);
        }
        config
    }

    // ========================================================================
    // Component construction
    // ========================================================================

    pub fn feed_pager(&self, backend: Arc<dyn SocialBackend>) -> FeedPager {
        FeedPager::with_settings(
            backend,
            self.feed.page_size,
            self.feed.end_reached_threshold,
        )
    }

    pub fn viewability_tracker(&self) -> ViewabilityTracker {
        ViewabilityTracker::new(self.feed.viewability_threshold)
    }

    pub fn audio_controller(&self, engine: Arc<dyn AudioEngine>) -> SessionAudioController {
        SessionAudioController::with_event_capacity(engine, self.audio.event_capacity)
    }

    /// Preview resolver over an arbitrary source, sized by `search.preview_cache_capacity`
    pub fn preview_resolver(&self, source: Arc<dyn PreviewSource>) -> PreviewResolver {
        PreviewResolver::new(source, self.search.preview_cache_capacity)
    }

    /// Preview resolver backed by the proxy at `proxy.url`
    pub fn proxy_preview_resolver(&self) -> Result<PreviewResolver> {
        let client = PreviewProxyClient::new(&self.proxy.url).map_err(VibeError::from)?;
        Ok(self.preview_resolver(Arc::new(client)))
    }

    pub fn song_search(
        &self,
        catalog: Arc<dyn TrackCatalog>,
        previews: Arc<PreviewResolver>,
        audio: Arc<SessionAudioController>,
    ) -> SongSearch {
        SongSearch::new(catalog, previews, audio, self.debounce())
    }
}
