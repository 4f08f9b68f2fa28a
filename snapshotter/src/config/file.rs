// File: snapshotter/src/config/file.rs
//! Optional TOML configuration file.
//!
//! Keys mirror the command-line flags in snake_case. Any key may be omitted;
//! flags and environment variables take precedence over the file.
//!
//! Example:
//! ```toml
//! service_name = "search"
//! env = "production"
//! url = "http://elasticsearch:9200"
//! bucket = "cluster-snapshots"
//! retry_interval = "30s"
//! max_retries = 10
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub service_name: Option<String>,
    pub env: Option<String>,
    pub url: Option<String>,
    pub indices: Option<String>,
    pub repository_format: Option<String>,
    pub snapshot_format: Option<String>,
    pub retry_interval: Option<String>,
    pub max_retries: Option<u32>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub compress: Option<bool>,
    pub date: Option<String>,
    pub date_format: Option<String>,
    pub ignore_unavailable: Option<bool>,
    pub include_global_state: Option<bool>,
    pub restore: Option<bool>,
    pub fail_on_poll_timeout: Option<bool>,
    pub retry_rejections: Option<bool>,
    pub retryable_status: Option<u16>,
    pub request_timeout: Option<String>,
}

impl ConfigFile {
    /// Load and parse a config file. A missing file is an error: the path was
    /// given explicitly.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Loaded configuration file {}", path.display());
        Ok(file)
    }
}
