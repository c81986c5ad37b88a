//! Configuration loading
//!
//! Handles:
//! - API credentials (client_id / api_key) and base URL
//! - Scan settings (page ceiling, output directory)
//! - Environment overrides for credentials

use crate::error::{Result, ScanError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "DUPSCAN_CONFIG";
pub const CLIENT_ID_ENV: &str = "DUPSCAN_CLIENT_ID";
pub const API_KEY_ENV: &str = "DUPSCAN_API_KEY";
pub const DEFAULT_CONFIG_FILE: &str = "dupscan.toml";
pub const DEFAULT_BASE_URL: &str = "https://api.amp.cisco.com";

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// Upper bound on fetched pages; `None` trusts the API to stop paging
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_true")]
    pub write_parsed: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_pages: None,
            output_dir: default_output_dir(),
            write_parsed: true,
        }
    }
}

impl ApiConfig {
    /// Entry point of the computers listing
    pub fn computers_url(&self) -> String {
        format!("{}/v1/computers", self.base_url.trim_end_matches('/'))
    }
}

impl ScanConfig {
    /// Load config from `$DUPSCAN_CONFIG` (or `dupscan.toml`), then apply env overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path();
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file location
    pub fn config_file_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ScanError::Config(format!("invalid config: {e}")))
    }

    /// Credentials from the environment take precedence over the file
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(client_id) = lookup(CLIENT_ID_ENV).filter(|v| !v.is_empty()) {
            debug!("client_id taken from {}", CLIENT_ID_ENV);
            self.api.client_id = client_id;
        }
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            debug!("api_key taken from {}", API_KEY_ENV);
            self.api.api_key = api_key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.client_id.trim().is_empty() {
            return Err(ScanError::Config("api.client_id is missing".into()));
        }
        if self.api.api_key.trim().is_empty() {
            return Err(ScanError::Config("api.api_key is missing".into()));
        }
        if self.scan.max_pages == Some(0) {
            return Err(ScanError::Config("scan.max_pages must be at least 1".into()));
        }
        Ok(())
    }
}
