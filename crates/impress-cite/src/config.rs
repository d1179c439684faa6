//! Configuration for impress-cite
//!
//! Controls the candidate cache window and how candidates are projected.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{CiteError, Result};

/// Longest accepted cache window
pub const MAX_CACHE_WINDOW_MS: u64 = 60_000;

/// Citation index configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CiteConfig {
    /// Candidates are reused until this many milliseconds have passed
    pub cache_window_ms: u64,
    /// Absent author/title/journal fields contribute `"undefined"` to the
    /// filter text instead of an empty string
    pub legacy_undefined_fields: bool,
    /// Keep only the first candidate for each citation key
    pub deduplicate_keys: bool,
}

impl Default for CiteConfig {
    fn default() -> Self {
        Self {
            cache_window_ms: 1000,
            legacy_undefined_fields: false,
            deduplicate_keys: false,
        }
    }
}

impl CiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache window as a duration.
    ///
    /// Values above [`MAX_CACHE_WINDOW_MS`] are capped there. Configurations
    /// loaded through `from_toml`, `from_json` or `from_file` are rejected
    /// instead; one built in code is only capped.
    pub fn cache_window(&self) -> Duration {
        Duration::milliseconds(self.cache_window_ms.min(MAX_CACHE_WINDOW_MS) as i64)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CiteError::UnreadableConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.cache_window_ms > MAX_CACHE_WINDOW_MS {
            return Err(CiteError::Config(format!(
                "cache_window_ms must be at most {}, got {}",
                MAX_CACHE_WINDOW_MS, self.cache_window_ms
            )));
        }
        Ok(())
    }
}
