//! Derived per-device connection state
//!
//! The backend is the only source of truth for `connected`. This state is
//! computed on read from the latest device record plus what the session knows
//! about in-flight actions; it is never stored on its own.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::device::{Device, Mac};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Seen by the backend, never observed connected in this session
    Discovered,
    /// A pair or disconnect for this device has not settled yet
    Pending,
    /// Backend reports the device connected
    Connected,
    /// Not connected now, but observed connected earlier in this session
    Disconnected,
}

impl ConnectionState {
    /// Derive the state for `device`
    ///
    /// `pending` holds MACs with an action in flight, `seen_connected` the MACs
    /// reported connected since they were last missing from the device list.
    pub fn derive(device: &Device, pending: &HashSet<Mac>, seen_connected: &HashSet<Mac>) -> Self {
        if pending.contains(&device.mac) {
            ConnectionState::Pending
        } else if device.connected {
            ConnectionState::Connected
        } else if seen_connected.contains(&device.mac) {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Discovered
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionState::Discovered => "discovered",
            ConnectionState::Pending => "pending",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macs(list: &[&str]) -> HashSet<Mac> {
        list.iter().map(|m| Mac::from(*m)).collect()
    }

    #[test]
    fn test_fresh_device_is_discovered() {
        let device = Device::new("AA:BB");
        let state = ConnectionState::derive(&device, &macs(&[]), &macs(&[]));
        assert_eq!(state, ConnectionState::Discovered);
    }

    #[test]
    fn test_pending_wins_over_backend_state() {
        let device = Device::new("AA:BB").with_connected(true);
        let state = ConnectionState::derive(&device, &macs(&["AA:BB"]), &macs(&["AA:BB"]));
        assert_eq!(state, ConnectionState::Pending);
    }

    #[test]
    fn test_connected_then_disconnected() {
        let seen = macs(&["AA:BB"]);
        let connected = Device::new("AA:BB").with_connected(true);
        assert_eq!(
            ConnectionState::derive(&connected, &macs(&[]), &seen),
            ConnectionState::Connected
        );

        let dropped = Device::new("AA:BB");
        assert_eq!(
            ConnectionState::derive(&dropped, &macs(&[]), &seen),
            ConnectionState::Disconnected
        );
    }
}
