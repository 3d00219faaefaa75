//! Configuration management.
//!
//! Config is stored at `~/.config/wfb/config.toml` and contains:
//! - the simple index to browse
//! - the number of archives kept in memory
//! - the User-Agent sent to the index

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::registry::{DEFAULT_CAPACITY, PYPI_SIMPLE};

const CONFIG_DIR: &str = "wfb";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Simple index base URL (default: https://pypi.org/simple).
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Archives kept in the in-memory cache (default: 128).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_index_url() -> String {
    PYPI_SIMPLE.to_string()
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_user_agent() -> String {
    format!("wfb/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            cache_capacity: default_cache_capacity(),
            user_agent: default_user_agent(),
        }
    }
}

impl BrowserConfig {
    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&path, content).context("Failed to write config file")
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.index_url)
            .with_context(|| format!("Invalid index URL: {}", self.index_url))?;
        self.capacity()?;
        Ok(())
    }

    pub fn capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.cache_capacity).context("cache_capacity must be at least 1")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert_eq!(config.index_url, "https://pypi.org/simple");
        assert_eq!(config.cache_capacity, 128);
        assert!(config.user_agent.starts_with("wfb/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: BrowserConfig =
            toml::from_str("index_url = \"https://example.org/simple\"").unwrap();
        assert_eq!(config.index_url, "https://example.org/simple");
        assert_eq!(config.cache_capacity, 128);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = BrowserConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_index_url_rejected() {
        let config = BrowserConfig {
            index_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = BrowserConfig {
            cache_capacity: 16,
            ..Default::default()
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BrowserConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.index_url, config.index_url);
        assert_eq!(parsed.cache_capacity, 16);
    }
}
