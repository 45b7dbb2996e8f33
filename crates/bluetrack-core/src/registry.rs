//! Device registry holding the latest complete device list
//!
//! The registry is never merged field by field. Every write replaces the
//! whole set, so a device missing from the newest list disappears.

use indexmap::IndexMap;
use tracing::debug;

use crate::device::{Device, Mac};

/// Ordered set of devices keyed by MAC, in backend order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    devices: IndexMap<Mac, Device>,
    revision: u64,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored set with `devices`, keeping their order
    ///
    /// A MAC listed twice keeps its first position and its last value.
    pub fn replace_all(&mut self, devices: Vec<Device>) {
        let mut next = IndexMap::with_capacity(devices.len());
        for device in devices {
            next.insert(device.mac.clone(), device);
        }

        let removed = self
            .devices
            .keys()
            .filter(|mac| !next.contains_key(*mac))
            .count();

        self.devices = next;
        self.revision += 1;

        debug!(
            count = self.devices.len(),
            removed,
            revision = self.revision,
            "Registry replaced"
        );
    }

    /// Current devices in backend order
    pub fn snapshot(&self) -> Vec<Device> {
        self.devices.values().cloned().collect()
    }

    pub fn get(&self, mac: &Mac) -> Option<&Device> {
        self.devices.get(mac)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of replacements applied since creation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }
}
