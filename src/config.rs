//! Configuration file parser for ~/.config/newsreel/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`,
//! and environment variables override whatever the file sets.
use crate::news::{SortBy, DEFAULT_BASE_URL, DEFAULT_COUNTRY};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const FALLBACK_APP_ID: &str = "ca-app-pub-3525464829772650~3611777643";
pub const FALLBACK_BANNER_ID: &str = "ca-app-pub-3525464829772650/8997842362";
pub const FALLBACK_INTERSTITIAL_ID: &str = "ca-app-pub-3525464829772650/4575930367";
pub const FALLBACK_REWARDED_ID: &str = "ca-app-pub-3525464829772650/3262848696";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Every table and key is optional; missing keys fall back to `Default`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub news: NewsApiConfig,
    pub ads: AdConfig,
}

/// `[news]` table.
///
/// Custom Debug masks `api_key` so it never reaches logs.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    /// NewsAPI credential. `NEWS_API_KEY` takes precedence.
    pub api_key: Option<String>,
    /// Service root. `NEWS_API_BASE_URL` takes precedence.
    pub base_url: String,
    /// Country code for headline requests.
    pub country: String,
    /// Search ordering: `publishedAt`, `relevancy` or `popularity`.
    pub sort_by: String,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            sort_by: SortBy::default().as_param().to_string(),
        }
    }
}

impl std::fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .field("sort_by", &self.sort_by)
            .finish()
    }
}

impl NewsApiConfig {
    /// Parsed search ordering; unrecognized values fall back to the default.
    pub fn sort_by(&self) -> SortBy {
        SortBy::from_str_name(&self.sort_by).unwrap_or_else(|| {
            tracing::warn!(sort_by = %self.sort_by, "Unknown sort_by value, using publishedAt");
            SortBy::default()
        })
    }
}

/// `[ads]` table: ad unit identifiers for the simulated ad service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdConfig {
    pub app_id: String,
    pub banner_id: String,
    pub interstitial_id: String,
    pub rewarded_id: String,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            app_id: FALLBACK_APP_ID.to_string(),
            banner_id: FALLBACK_BANNER_ID.to_string(),
            interstitial_id: FALLBACK_INTERSTITIAL_ID.to_string(),
            rewarded_id: FALLBACK_REWARDED_ID.to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.news.base_url,
            has_api_key = config.news.api_key.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply process environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, which maps an environment variable name
    /// to its value. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("NEWS_API_KEY") {
            self.news.api_key = Some(key);
        }
        if let Some(base) = get("NEWS_API_BASE_URL") {
            tracing::info!(base_url = %base, "Using news base URL from environment");
            self.news.base_url = base;
        }
        if let Some(id) = get("ADMOB_APP_ID") {
            self.ads.app_id = id;
        }
        if let Some(id) = get("ADMOB_BANNER_ID") {
            self.ads.banner_id = id;
        }
        if let Some(id) = get("ADMOB_INTERSTITIAL_ID") {
            self.ads.interstitial_id = id;
        }
        if let Some(id) = get("ADMOB_REWARDED_ID") {
            self.ads.rewarded_id = id;
        }
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    const NEWS_KEYS: [&str; 4] = ["api_key", "base_url", "country", "sort_by"];
    const AD_KEYS: [&str; 4] = ["app_id", "banner_id", "interstitial_id", "rewarded_id"];

    for (key, value) in raw {
        let known: &[&str] = match key.as_str() {
            "news" => &NEWS_KEYS,
            "ads" => &AD_KEYS,
            _ => {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                continue;
            }
        };
        if let Some(table) = value.as_table() {
            for inner in table.keys() {
                if !known.contains(&inner.as_str()) {
                    tracing::warn!(key = %format!("{key}.{inner}"), "Unknown key in config file, ignoring");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
