//! Configuration module for petshop

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths;
use crate::theme::Theme;

/// Environment variable that overrides the configured API URL
pub const API_URL_ENV: &str = "PETSHOP_API_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the Pet Shop API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Selected theme
    #[serde(default)]
    pub theme: Theme,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Whether to download and draw pet photos in expanded cards
    #[serde(default = "default_show_photos")]
    pub show_photos: bool,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_show_photos() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            theme: Theme::default(),
            request_timeout_secs: default_request_timeout(),
            show_photos: default_show_photos(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Apply the environment and command-line API URL overrides.
    ///
    /// The command line wins over the environment, which wins over the file.
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Self {
        if let Some(url) = cli_url.or(env_url).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:8000");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_url: "http://petshop.local:9000".to_string(),
            request_timeout_secs: 5,
            show_photos: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"http://example.test\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "http://example.test");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.show_photos);
    }

    #[test]
    fn test_override_precedence() {
        let config = Config::default().with_overrides(Some("http://env:1/".to_string()), None);
        assert_eq!(config.api_url, "http://env:1");

        let config = Config::default().with_overrides(
            Some("http://env:1".to_string()),
            Some("http://cli:2".to_string()),
        );
        assert_eq!(config.api_url, "http://cli:2");

        let config = Config::default().with_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api_url, "http://localhost:8000");
    }
}
