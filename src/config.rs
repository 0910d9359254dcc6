//! Client configuration.
//!
//! Lookup order, lowest to highest: built-in defaults, `~/.knowhub/config.toml`,
//! `KNOWHUB_*` environment variables, command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const API_URL_ENV: &str = "KNOWHUB_API_URL";
pub const SESSION_FILE_ENV: &str = "KNOWHUB_SESSION_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Knowledge Hub API
    pub api_url: String,
    /// Where the session (token + user) is persisted
    pub session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: crate::session::default_session_file(),
        }
    }
}

/// Get the default config file path
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".knowhub")
        .join("config.toml")
}

impl Config {
    /// Load from the default location, falling back to defaults when the file
    /// does not exist. Environment overrides are applied.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut cfg = if path.exists() {
            Self::read_file(&path)?
        } else {
            Self::default()
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::read_file(path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    fn read_file(path: &Path) -> Result<Self> {
        tracing::debug!("loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(file) = std::env::var(SESSION_FILE_ENV) {
            if !file.trim().is_empty() {
                self.session_file = PathBuf::from(file);
            }
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, api_url: Option<&str>, session_file: Option<&Path>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.to_string();
        }
        if let Some(file) = session_file {
            self.session_file = file.to_path_buf();
        }
        self
    }

    /// Check the configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let url = self.api_url.trim();
        if url.is_empty() {
            errors.push("api_url: must not be empty".to_string());
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!(
                "api_url: '{}' must start with http:// or https://",
                url
            ));
        }

        if self.session_file.as_os_str().is_empty() {
            errors.push("session_file: must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
