/// Proxy configuration
use crate::error::{ProxyError, Result};
use crate::finder::DEFAULT_PAGE_BASE_URL;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "preview-proxy.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub finder: FinderSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FinderSettings {
    #[serde(default = "default_page_base_url")]
    pub page_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_page_base_url() -> String {
    DEFAULT_PAGE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            page_base_url: default_page_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProxyConfig {
    /// Load configuration from file and environment
    ///
    /// A plain `PORT` variable sets the default port, so hosting platforms
    /// that inject it work without extra setup. The config file and
    /// `VIBE_PROXY__SERVER__PORT` still take precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(port) = std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse::<u16>().ok())
        {
            settings = settings.set_default("server.port", i64::from(port))?;
        }

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

        // Override with environment variables (prefixed with VIBE_PROXY__)
        settings = settings.add_source(
            config::Environment::with_prefix("VIBE_PROXY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|e| ProxyError::Config(format!("Invalid host {:?}: {}", self.server.host, e)))?;

        if self.finder.page_base_url.trim().is_empty() {
            return Err(ProxyError::Config(
                "finder.page_base_url cannot be empty".to_string(),
            ));
        }

        if self.finder.timeout_secs == 0 {
            return Err(ProxyError::Config(
                "finder.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let host = self
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|e| ProxyError::Config(e.to_string()))?;
        Ok(SocketAddr::from((host, self.server.port)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.finder.timeout_secs)
    }
}
