//! # Configuration Module
//!
//! Client configuration structures and loading mechanisms.
//!
//! ## Key Features
//! - YAML configuration parsing with serde
//! - Human-readable durations ("5m", "300ms") via humantime
//! - Environment variable override support (`MARKETPLACE_*`)
//! - Validation with detailed error messages
//!
//! Defaults follow the behavior tuned in production: a 5 minute cache TTL,
//! a 300 ms typeahead quiet period, and per-class request timeouts of
//! 3 s (suggestions), 10 s (search/listing) and 30 s (uploads).

use crate::core::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main client configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, e.g. "https://api.example.com/v1/"
    pub base_url: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-class request timeouts
    pub timeouts: TimeoutConfig,

    /// Cache behavior
    pub cache: CacheSettings,

    /// Typeahead debounce behavior
    pub debounce: DebounceConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/".to_string(),
            user_agent: format!("marketplace-client/{}", env!("CARGO_PKG_VERSION")),
            timeouts: TimeoutConfig::default(),
            cache: CacheSettings::default(),
            debounce: DebounceConfig::default(),
        }
    }
}

/// Request timeout configuration, one duration per call class
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Typeahead suggestion lookups
    #[serde(with = "humantime_serde")]
    pub suggestion: Duration,

    /// Search and listing calls
    #[serde(with = "humantime_serde")]
    pub listing: Duration,

    /// File uploads (CVs, logos, banners)
    #[serde(with = "humantime_serde")]
    pub upload: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            suggestion: Duration::from_secs(3),
            listing: Duration::from_secs(10),
            upload: Duration::from_secs(30),
        }
    }
}

/// Cache store configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheSettings {
    /// TTL applied by `set` when no explicit TTL is given
    #[serde(with = "humantime_serde")]
    pub default_ttl: Duration,

    /// Advisory entry cap; at capacity, expired entries are purged first
    pub max_entries: usize,

    /// Interval of the background expired-entry sweep
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            max_entries: 1000,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Debounce gate configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period input must be stable for before a fetch is issued
    #[serde(with = "humantime_serde")]
    pub quiet_period: Duration,

    /// Queries shorter than this resolve to an empty result without a fetch
    pub min_query_len: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(300),
            min_query_len: 2,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::config(format!("failed to read config file: {}", e)))?;

        let mut config: ClientConfig = serde_yaml::from_str(&content)
            .map_err(|e| ApiError::config(format!("failed to parse config: {}", e)))?;

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    ///
    /// Variables follow the pattern `MARKETPLACE_<SECTION>_<FIELD>`, e.g.
    /// `MARKETPLACE_BASE_URL=https://api.example.com/` or
    /// `MARKETPLACE_CACHE_TTL=2m`.
    pub fn apply_env_overrides(&mut self) -> ApiResult<()> {
        use std::env;

        if let Ok(url) = env::var("MARKETPLACE_BASE_URL") {
            self.base_url = url;
        }

        if let Ok(ttl) = env::var("MARKETPLACE_CACHE_TTL") {
            self.cache.default_ttl = humantime::parse_duration(&ttl)
                .map_err(|e| ApiError::config(format!("invalid MARKETPLACE_CACHE_TTL: {}", e)))?;
        }

        if let Ok(period) = env::var("MARKETPLACE_DEBOUNCE_QUIET_PERIOD") {
            self.debounce.quiet_period = humantime::parse_duration(&period).map_err(|e| {
                ApiError::config(format!("invalid MARKETPLACE_DEBOUNCE_QUIET_PERIOD: {}", e))
            })?;
        }

        if let Ok(timeout) = env::var("MARKETPLACE_TIMEOUT_SUGGESTION") {
            self.timeouts.suggestion = humantime::parse_duration(&timeout).map_err(|e| {
                ApiError::config(format!("invalid MARKETPLACE_TIMEOUT_SUGGESTION: {}", e))
            })?;
        }

        if let Ok(timeout) = env::var("MARKETPLACE_TIMEOUT_LISTING") {
            self.timeouts.listing = humantime::parse_duration(&timeout).map_err(|e| {
                ApiError::config(format!("invalid MARKETPLACE_TIMEOUT_LISTING: {}", e))
            })?;
        }

        if let Ok(timeout) = env::var("MARKETPLACE_TIMEOUT_UPLOAD") {
            self.timeouts.upload = humantime::parse_duration(&timeout).map_err(|e| {
                ApiError::config(format!("invalid MARKETPLACE_TIMEOUT_UPLOAD: {}", e))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration, returning a detailed error on failure
    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::config(format!("invalid base_url '{}': {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ApiError::config(format!(
                    "base_url scheme must be http or https, got '{}'",
                    other
                )))
            }
        }

        if self.cache.default_ttl.is_zero() {
            return Err(ApiError::config("cache.default_ttl must be positive"));
        }

        if self.cache.max_entries == 0 {
            return Err(ApiError::config("cache.max_entries must be positive"));
        }

        if self.debounce.min_query_len == 0 {
            return Err(ApiError::config("debounce.min_query_len must be at least 1"));
        }

        Ok(())
    }

    /// The parsed base URL
    pub(crate) fn parsed_base_url(&self) -> ApiResult<Url> {
        Ok(Url::parse(&self.base_url)?)
    }
}
