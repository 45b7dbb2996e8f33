//! Device types for tracking discovered wireless endpoints

use serde::{Deserialize, Serialize};

/// Hardware address of a device, the registry primary key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mac(pub String);

impl Mac {
    pub fn new(mac: impl Into<String>) -> Self {
        Self(mac.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Mac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Mac {
    fn from(mac: &str) -> Self {
        Self(mac.to_string())
    }
}

impl From<String> for Mac {
    fn from(mac: String) -> Self {
        Self(mac)
    }
}

/// A discovered device as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Stable hardware identifier
    pub mac: Mac,
    /// Advertised or resolved name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Estimated distance in meters, `None` when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Last-known connection state reported by the backend
    #[serde(default)]
    pub connected: bool,
    /// Signal strength in dBm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    /// Whether the backend has paired with the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired: Option<bool>,
    /// Calibrated transmit power in dBm
    #[serde(default, rename = "txPower", skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<i32>,
}

impl Device {
    /// Create a disconnected device with no name and unknown distance
    pub fn new(mac: impl Into<Mac>) -> Self {
        Self {
            mac: mac.into(),
            name: None,
            distance: None,
            connected: false,
            rssi: None,
            paired: None,
            tx_power: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance = Some(meters);
        self
    }

    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Name if the backend reported a non-empty one
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Label used where a device must always have text: name, else mac
    pub fn label(&self) -> &str {
        self.display_name().unwrap_or(self.mac.as_str())
    }

    /// Known distance in meters
    ///
    /// Negative or non-finite values are reported as unknown.
    pub fn known_distance(&self) -> Option<f64> {
        self.distance.filter(|d| d.is_finite() && *d >= 0.0)
    }
}
