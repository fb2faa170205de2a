//! Client configuration
//!
//! Settings live at `<config dir>/jutge/config.toml` (e.g.
//! `~/.config/jutge/config.toml` on Linux). Every field is optional. The
//! `JUTGE_API_URL` environment variable overrides the configured URL.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.jutge.org/api";

/// Environment variable overriding the API endpoint
pub const API_URL_ENV: &str = "JUTGE_API_URL";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint every request is posted to
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Whether responses of functions with a TTL are cached
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
    /// Cache lifetime in seconds, keyed by function name
    #[serde(default)]
    pub client_ttls: HashMap<String, u64>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_use_cache() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            use_cache: default_use_cache(),
            client_ttls: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Path of the user configuration file, if a config dir exists
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jutge").join("config.toml"))
    }

    /// Load the user configuration, falling back to defaults
    ///
    /// A missing or unreadable file yields the defaults. The environment
    /// override is applied last.
    #[must_use]
    pub fn load() -> Self {
        let mut config: Self = Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Replace the API URL with `JUTGE_API_URL` when it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            self.api_url = url;
        }
    }

    /// Save to the user configuration file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| ClientError::Config("no configuration directory".to_string()))?;
        self.save_to(&path)
    }

    /// Save to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Use a different API URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Cache responses of `func` for `seconds`
    #[must_use]
    pub fn with_ttl(mut self, func: impl Into<String>, seconds: u64) -> Self {
        self.client_ttls.insert(func.into(), seconds);
        self
    }

    /// Cache lifetime of `func`, when caching applies to it
    #[must_use]
    pub fn ttl(&self, func: &str) -> Option<u64> {
        if self.use_cache {
            self.client_ttls.get(func).copied()
        } else {
            None
        }
    }
}
