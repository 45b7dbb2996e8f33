//! User-visible error categories
//!
//! Each category maps to exactly one message. The session keeps only the
//! latest category, a new attempt overwrites the previous one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::Mac;

/// Backend command issued on behalf of a single device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Pair,
    Connect,
    Disconnect,
}

impl ActionKind {
    /// Backend path segment for this command
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Pair => "pair",
            ActionKind::Connect => "connect",
            ActionKind::Disconnect => "disconnect",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Pair => write!(f, "Pair"),
            ActionKind::Connect => write!(f, "Connect"),
            ActionKind::Disconnect => write!(f, "Disconnect"),
        }
    }
}

/// Error shown to the user; `Display` is the message
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request failed before a usable JSON body arrived
    #[error("Backend unreachable")]
    NetworkUnreachable,

    /// Device list body parsed but had no usable `devices` field
    #[error("Failed to fetch devices")]
    MalformedResponse,

    /// Scan request failed for any reason
    #[error("Scan failed")]
    ScanFailure,

    /// A pair, connect, or disconnect command was rejected or unreachable
    #[error("{action} failed for {mac}")]
    ActionFailure { action: ActionKind, mac: Mac },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ErrorCategory::NetworkUnreachable.to_string(), "Backend unreachable");
        assert_eq!(ErrorCategory::MalformedResponse.to_string(), "Failed to fetch devices");
        assert_eq!(ErrorCategory::ScanFailure.to_string(), "Scan failed");

        let failure = ErrorCategory::ActionFailure {
            action: ActionKind::Pair,
            mac: Mac::from("AA:BB"),
        };
        assert_eq!(failure.to_string(), "Pair failed for AA:BB");
    }

    #[test]
    fn test_action_paths() {
        assert_eq!(ActionKind::Pair.as_str(), "pair");
        assert_eq!(ActionKind::Connect.as_str(), "connect");
        assert_eq!(ActionKind::Disconnect.as_str(), "disconnect");
    }
}
