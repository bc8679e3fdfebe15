// src/infrastructure/config.rs
use crate::constants::APP_DIR_NAME;
use crate::domain::{DomainError, Language};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// TOML configuration for the backend connection and form defaults
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://<ref>.supabase.co`
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Defaults {
    /// Language used by `responses add` when `--language` is omitted
    #[serde(default)]
    pub language: Language,
}

impl Config {
    /// Platform config location: `<config dir>/quick-answers/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load the file if present, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(path = %path.as_ref().display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Command-line values win over the file.
    pub fn with_overrides(mut self, url: Option<String>, anon_key: Option<String>) -> Self {
        if let Some(url) = url {
            self.backend.url = url;
        }
        if let Some(anon_key) = anon_key {
            self.backend.anon_key = anon_key;
        }
        self
    }

    pub fn backend(&self) -> Result<&BackendConfig, DomainError> {
        if self.backend.url.trim().is_empty() || self.backend.anon_key.trim().is_empty() {
            return Err(DomainError::Config(
                "Backend not configured: set [backend] url and anon_key, or pass --url and --anon-key"
                    .to_string(),
            ));
        }
        Ok(&self.backend)
    }
}
