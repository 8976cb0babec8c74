//! Search configuration with documented defaults
//!
//! Values can come from a TOML file, the `ECF_API_URL` environment variable
//! and command-line flags, in increasing order of precedence.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SeparationError};

/// Default ECF rating API endpoint
pub const DEFAULT_BASE_URL: &str = "https://rating.englishchess.org.uk/v2/new/api.php";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "ECF_API_URL";

/// Configuration for a separation search session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Rating API endpoint; requests are built as `{base_url}?v2/...`
    pub base_url: String,

    /// Largest separation value the search will report
    ///
    /// Every extra level multiplies the number of upstream calls by the
    /// average number of distinct opponents beaten, so keep this small.
    pub max_depth: u32,

    /// Games requested per player per category
    ///
    /// The service does not paginate past this bound. Wins older than the
    /// most recent `game_limit` games are invisible to the search.
    pub game_limit: u32,

    /// Courtesy pause before a fresh search starts (milliseconds)
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_depth: 5,
            game_limit: 100,
            request_delay_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SeparationError::Config(format!("Failed to parse config TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SeparationError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `ECF_API_URL` if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        self
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SeparationError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }

        if self.game_limit == 0 {
            return Err(SeparationError::Config(
                "game_limit must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SeparationError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
