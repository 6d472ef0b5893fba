//! Configuration management for cloud-archive

use crate::error::{Error, Result};
use crate::storage::DEFAULT_CACHE_CONTROL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache-control directive set on uploaded objects
    pub cache_control: String,

    /// Show a progress bar instead of per-file lines
    pub progress: bool,

    /// Plan only, upload nothing
    pub dry_run: bool,

    /// GCS service-account key file (falls back to GOOGLE_APPLICATION_CREDENTIALS)
    pub credentials_path: Option<PathBuf>,

    /// Custom endpoint for S3-compatible storage (MinIO, R2, Backblaze, ...)
    pub s3_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
            progress: false,
            dry_run: false,
            credentials_path: None,
            s3_endpoint: None,
        }
    }
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io("reading config", e))?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io("creating config dir", e))?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("serializing config: {}", e)))?;
        std::fs::write(path, contents).map_err(|e| Error::io("writing config", e))?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("cloud-archive").join("config.toml"))
            .ok_or_else(|| Error::config("could not determine config directory"))
    }
}
