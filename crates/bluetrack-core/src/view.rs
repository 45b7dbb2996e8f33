//! Device list projection

use serde::Serialize;
use std::collections::HashSet;

use crate::connection::ConnectionState;
use crate::device::{Device, Mac};

/// Title shown for devices without a name
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

/// Button offered next to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceAction {
    Pair,
    Disconnect,
}

impl std::fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceAction::Pair => write!(f, "Pair"),
            DeviceAction::Disconnect => write!(f, "Disconnect"),
        }
    }
}

/// One entry of the device list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    pub mac: Mac,
    pub title: String,
    pub distance: String,
    pub action: DeviceAction,
    pub state: ConnectionState,
}

impl DeviceRow {
    pub fn from_device(
        device: &Device,
        pending: &HashSet<Mac>,
        seen_connected: &HashSet<Mac>,
    ) -> Self {
        let distance = match device.known_distance() {
            Some(meters) => format!("Distance: {} m", meters),
            None => "Distance: ?".to_string(),
        };
        let action = if device.connected {
            DeviceAction::Disconnect
        } else {
            DeviceAction::Pair
        };

        Self {
            mac: device.mac.clone(),
            title: device
                .display_name()
                .unwrap_or(UNKNOWN_DEVICE_NAME)
                .to_string(),
            distance,
            action,
            state: ConnectionState::derive(device, pending, seen_connected),
        }
    }
}

/// Derive list rows from a registry snapshot, in snapshot order
pub fn project_list(
    devices: &[Device],
    pending: &HashSet<Mac>,
    seen_connected: &HashSet<Mac>,
) -> Vec<DeviceRow> {
    devices
        .iter()
        .map(|d| DeviceRow::from_device(d, pending, seen_connected))
        .collect()
}

/// Scan button label and enabled state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanButton {
    pub label: &'static str,
    pub enabled: bool,
}

impl ScanButton {
    pub fn for_scanning(scanning: bool) -> Self {
        if scanning {
            Self {
                label: "Scanning...",
                enabled: false,
            }
        } else {
            Self {
                label: "Scan",
                enabled: true,
            }
        }
    }
}
