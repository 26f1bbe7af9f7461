//! # Client Configuration
//!
//! Configuration for the API client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     SIGEV_API_BASE_URL=https://staging.example.com                      │
//! │     SIGEV_API_TIMEOUT_MS=30000                                          │
//! │     SIGEV_TOKEN_PATH=/tmp/session.token (see crate::token)              │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/sigev-pyme/client.toml (Linux)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     Production API URL, 15000 ms timeout                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "https://sigev-pyme-webapi.onrender.com"
//! timeout_ms = 15000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

/// Production API base URL, used when nothing overrides it.
pub const DEFAULT_BASE_URL: &str = "https://sigev-pyme-webapi.onrender.com";

/// Default per-request timeout (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

// =============================================================================
// API Settings
// =============================================================================

/// Connection settings for the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL, scheme included, no trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (milliseconds).
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)
                    .map_err(|e| ApiError::Config(format!("invalid config file: {}", e)))?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ApiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ApiError::Config("no config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ApiError::Config(format!("serialize failed: {}", e)))?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                url
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(ApiError::Config("timeout_ms must be greater than 0".into()));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SIGEV_API_BASE_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("SIGEV_API_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.api.timeout_ms = t;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("pe", "sigev", "sigev-pyme")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// Base URL with any trailing slash stripped.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }
}
