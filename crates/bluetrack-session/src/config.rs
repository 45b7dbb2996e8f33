//! Session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How settled responses that overlap are applied to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyPolicy {
    /// Only apply an outcome newer (by issue order) than the last applied one
    #[default]
    LastIssued,
    /// Apply every outcome as it completes; a slow older response can
    /// overwrite a newer one
    LastCompleted,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Time between scheduled device list fetches
    pub poll_interval: Duration,
    /// Scan duration sent when none is given
    pub scan_duration_secs: u64,
    /// Ordering rule for overlapping registry writes
    pub apply_policy: ApplyPolicy,
    /// Report failed pair/connect/disconnect commands as the session error
    pub surface_action_errors: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            scan_duration_secs: 10,
            apply_policy: ApplyPolicy::LastIssued,
            surface_action_errors: true,
        }
    }
}
