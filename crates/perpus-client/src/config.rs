//! # Client Configuration
//!
//! Where the API lives and where the session cache is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PERPUS_API_URL=https://api.example.com/api/v1                      │
//! │     PERPUS_TIMEOUT_SECS=10                                             │
//! │     PERPUS_CACHE_DIR=/tmp/perpus                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/perpus/client.toml (Linux)                               │
//! │     ~/Library/Application Support/com.perpus.client/client.toml        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://be-perpus-production-0f16.up.railway.app/api/v1"
//! timeout_secs = 30
//!
//! [cache]
//! dir = "/home/me/.local/share/perpus/session"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Production API the web client ships with.
pub const DEFAULT_BASE_URL: &str = "https://be-perpus-production-0f16.up.railway.app/api/v1";

// =============================================================================
// API Settings
// =============================================================================

/// HTTP settings, applied once process-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every request path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Session cache location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Directory holding the cache entries.
    /// Defaults to the platform data directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Config(format!("{}: {}", parent.display(), e)))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PERPUS_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("PERPUS_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric PERPUS_TIMEOUT_SECS"),
            }
        }

        if let Ok(dir) = std::env::var("PERPUS_CACHE_DIR") {
            debug!(dir = %dir, "Overriding cache dir from environment");
            self.cache.dir = Some(PathBuf::from(dir));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "perpus", "client")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Cache directory: configured, or the platform data directory.
    pub fn cache_dir(&self) -> ClientResult<PathBuf> {
        if let Some(dir) = &self.cache.dir {
            return Ok(dir.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("session"))
            .ok_or_else(|| ClientError::Config("Could not determine app data directory".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://files.example.com".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "http://localhost:8000/api/v1".to_string();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));

        config.api.timeout_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8000/api/v1"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.toml");

        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:9000/api/v1".to_string();
        config.cache.dir = Some(dir.path().join("cache"));
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.base_url(), "http://127.0.0.1:9000/api/v1");
        assert_eq!(loaded.cache_dir().unwrap(), dir.path().join("cache"));
    }
}
