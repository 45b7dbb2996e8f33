use bluetrack_core::{ActionKind, Mac};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Transport failure, timeout, or a body that is not JSON
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// JSON body without a usable `devices` list
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Device command answered with an error status or `success: false`
    #[error("Backend rejected {action} for {mac}: {reason}")]
    Rejected {
        action: ActionKind,
        mac: Mac,
        reason: String,
    },
}

impl ClientError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ClientError::Malformed(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Unreachable(err.to_string())
    }
}
