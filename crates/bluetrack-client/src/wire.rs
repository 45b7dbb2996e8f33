//! Request and response bodies of the backend REST API

use bluetrack_core::{ActionKind, Device, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Body of `POST /api/scan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Scan duration in seconds
    pub duration: u64,
}

/// Body of `POST /api/pair`, `/api/connect`, and `/api/disconnect`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacRequest {
    pub mac: Mac,
}

/// Acknowledgement body; only `success` is inspected
#[derive(Debug, Deserialize)]
struct Ack {
    success: Option<bool>,
}

/// Decode a `{devices: [...]}` body
///
/// A body that is not JSON at all counts as unreachable, like a dropped
/// connection. JSON without a `devices` list is malformed.
pub fn decode_devices(body: &[u8]) -> Result<Vec<Device>, ClientError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ClientError::Unreachable(format!("invalid JSON body: {}", e)))?;

    let devices = match value.get("devices") {
        None | Some(Value::Null) => {
            return Err(ClientError::Malformed("missing devices field".to_string()))
        }
        Some(devices) => devices.clone(),
    };

    serde_json::from_value(devices)
        .map_err(|e| ClientError::Malformed(format!("invalid devices list: {}", e)))
}

/// Decode the acknowledgement of a device command
///
/// The body shape is loosely defined: only an error status or an explicit
/// `success: false` count as failure.
pub fn decode_ack(
    action: ActionKind,
    mac: &Mac,
    status: u16,
    body: &[u8],
) -> Result<(), ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Rejected {
            action,
            mac: mac.clone(),
            reason: format!("status {}", status),
        });
    }

    match serde_json::from_slice::<Ack>(body) {
        Ok(Ack {
            success: Some(false),
        }) => Err(ClientError::Rejected {
            action,
            mac: mac.clone(),
            reason: "backend reported failure".to_string(),
        }),
        _ => Ok(()),
    }
}
