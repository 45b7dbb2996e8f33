//! Configuration loading

use anyhow::{Context, Result};
use bluetrack_client::DEFAULT_BASE_URL;
use bluetrack_session::{ApplyPolicy, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the device backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSection {
    /// Device list refresh interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Duration requested for user-triggered scans
    #[serde(default = "default_scan_duration")]
    pub scan_duration_secs: u64,
    /// Which settled fetch or scan wins when they complete out of order
    #[serde(default)]
    pub apply_policy: ApplyPolicy,
    /// Show failed pair and disconnect commands as the session error
    #[serde(default = "default_true")]
    pub surface_action_errors: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            scan_duration_secs: default_scan_duration(),
            apply_policy: ApplyPolicy::default(),
            surface_action_errors: true,
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

fn default_scan_duration() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    /// Convert to SessionConfig
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            // A zero interval would make tokio's interval panic
            poll_interval: Duration::from_secs(self.session.poll_interval_secs.max(1)),
            scan_duration_secs: self.session.scan_duration_secs,
            apply_policy: self.session.apply_policy,
            surface_action_errors: self.session.surface_action_errors,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
