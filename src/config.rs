//! Configuration Management
//!
//! Handles persistent configuration storage for the gcompute CLI.

use anyhow::{Context, Result};
use gcompute::gcp::auth;
use gcompute::gcp::client::DEFAULT_COMPUTE_ENDPOINT;
use gcompute::gcp::http::DEFAULT_REQUEST_TIMEOUT;
use gcompute::RpcOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Project used when `--project` is not given
    #[serde(default)]
    pub project_id: Option<String>,
    /// Zone used by zonal calls when `--zone` is not given
    #[serde(default)]
    pub zone: Option<String>,
    /// Compute Engine endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Options applied to every call unless overridden on the command line.
    /// A saved `pageToken` is never applied.
    #[serde(default)]
    pub default_options: RpcOptions,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcompute").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective project (CLI > config > gcloud default)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.project_id.clone())
            .or_else(auth::get_default_project)
    }

    /// Get effective zone (CLI > config > gcloud default)
    pub fn effective_zone(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.zone.clone())
            .or_else(auth::get_default_zone)
    }

    /// Get effective request timeout (CLI > config > transport default)
    pub fn effective_timeout(&self, cli_secs: Option<u64>) -> Duration {
        cli_secs
            .or(self.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Get effective endpoint (CLI > config > public endpoint)
    pub fn effective_endpoint(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_COMPUTE_ENDPOINT.to_string())
    }
}
