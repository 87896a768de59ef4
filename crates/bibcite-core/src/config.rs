//! Configuration for bibcite-core
//!
//! Centralized configuration for lookup providers, rendering defaults and
//! caching. Every section has defaults, so a partial file is enough.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bibcite_domain::Locale;

use crate::error::ConfigurationError;

/// Engine-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// DOI / ISBN lookup settings
    pub lookup: LookupConfig,
    /// Rendering defaults
    pub render: RenderConfig,
    /// Suffix and render cache settings
    pub cache: CacheConfig,
}

/// Lookup provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after a transient failure (0 or 1)
    pub max_retries: u32,
    pub user_agent: String,
    /// Contact address for the Crossref polite pool
    pub mailto: Option<String>,
    pub crossref_base_url: String,
    pub openlibrary_base_url: String,
    /// Maximum number of candidates returned for a free-text query
    pub max_candidates: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            max_retries: 1,
            user_agent: format!("bibcite/{}", env!("CARGO_PKG_VERSION")),
            mailto: None,
            crossref_base_url: "https://api.crossref.org".to_string(),
            openlibrary_base_url: "https://openlibrary.org".to_string(),
            max_candidates: 10,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Rendering defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Locale for references without a language tag or Thai script
    pub default_locale: Locale,
    /// Render bibliography entries as HTML instead of plain text
    pub html_output: bool,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Rendered entries kept before the render cache is flushed
    pub max_render_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_render_entries: 4096,
        }
    }
}

/// On-disk encodings accepted by [`EngineConfig::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; anything else is read as TOML
    pub fn for_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl EngineConfig {
    /// Parse without validating; missing sections fall back to defaults
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigurationError> {
        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(ConfigurationError::Unreadable)
    }

    pub fn to_text(&self, format: ConfigFormat) -> Result<String, ConfigurationError> {
        let rendered = match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
        };
        rendered.map_err(ConfigurationError::Unreadable)
    }

    /// Default location: `<config dir>/bibcite/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bibcite").join("config.toml"))
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Unreadable(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&text, ConfigFormat::for_path(path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from [`Self::default_path`] when that file exists, else defaults
    pub fn load_or_default() -> Result<Self, ConfigurationError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values the engine cannot honour
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        // Lookups must stay interactive: seconds, not minutes
        if !(1..=30).contains(&self.lookup.timeout_secs) {
            return Err(ConfigurationError::OutOfRange(
                "lookup.timeout_secs must be between 1 and 30".to_string(),
            ));
        }

        if self.lookup.max_retries > 1 {
            return Err(ConfigurationError::OutOfRange(
                "lookup.max_retries must be 0 or 1".to_string(),
            ));
        }

        if self.lookup.max_candidates == 0 {
            return Err(ConfigurationError::OutOfRange(
                "lookup.max_candidates must be positive".to_string(),
            ));
        }

        for (name, base) in [
            ("lookup.crossref_base_url", &self.lookup.crossref_base_url),
            ("lookup.openlibrary_base_url", &self.lookup.openlibrary_base_url),
        ] {
            if url::Url::parse(base).is_err() {
                return Err(ConfigurationError::OutOfRange(format!(
                    "{} is not a valid URL",
                    name
                )));
            }
        }

        if self.cache.enabled && self.cache.max_render_entries == 0 {
            return Err(ConfigurationError::OutOfRange(
                "cache.max_render_entries must be positive when the cache is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
