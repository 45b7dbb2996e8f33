//! Mock backend state

use bluetrack_core::{Device, Mac};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Knobs for simulating backend misbehavior
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Answer device lists without a `devices` field
    pub malformed: bool,
    /// Answer every device command with an error status
    pub fail_actions: bool,
    /// Delay applied before answering any request
    pub delay: Duration,
    /// Fraction of the requested scan duration to actually wait
    pub scan_time_scale: f64,
}

/// A request as received by the mock, for ordering assertions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Shared mock state
pub struct MockState {
    devices: RwLock<Vec<Device>>,
    behavior: RwLock<Behavior>,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl MockState {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices: RwLock::new(devices),
            behavior: RwLock::new(Behavior::default()),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Current device list
    pub async fn devices(&self) -> Vec<Device> {
        self.devices.read().await.clone()
    }

    /// Replace the device list
    pub async fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.write().await = devices;
    }

    pub async fn behavior(&self) -> Behavior {
        self.behavior.read().await.clone()
    }

    pub async fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.write().await = behavior;
    }

    pub async fn set_malformed(&self, malformed: bool) {
        self.behavior.write().await.malformed = malformed;
    }

    pub async fn set_fail_actions(&self, fail: bool) {
        self.behavior.write().await.fail_actions = fail;
    }

    pub async fn set_delay(&self, delay: Duration) {
        self.behavior.write().await.delay = delay;
    }

    /// Requests received so far, in arrival order
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn clear_requests(&self) {
        self.requests.write().await.clear();
    }

    pub(crate) async fn record(&self, method: &str, path: &str, body: Option<serde_json::Value>) {
        self.requests.write().await.push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body,
        });
    }

    /// Apply `update` to the device with `mac`, returns false if unknown
    pub(crate) async fn update_device(&self, mac: &Mac, update: impl FnOnce(&mut Device)) -> bool {
        let mut devices = self.devices.write().await;
        match devices.iter_mut().find(|d| &d.mac == mac) {
            Some(device) => {
                update(device);
                info!(mac = %mac, connected = device.connected, "Mock device updated");
                true
            }
            None => false,
        }
    }
}
