//! Device fixtures loaded from TOML
//!
//! ```toml
//! [[device]]
//! mac = "AA:BB:CC:DD:EE:01"
//! name = "Earbuds"
//! distance = 1.2
//! connected = false
//! ```

use bluetrack_core::Device;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Duplicate device MAC in fixtures: {0}")]
    DuplicateMac(String),
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default, rename = "device")]
    devices: Vec<Device>,
}

/// Parse fixtures from TOML text
pub fn parse_fixtures(content: &str) -> Result<Vec<Device>, FixtureError> {
    let file: FixtureFile = toml::from_str(content)?;

    let mut seen = std::collections::HashSet::new();
    for device in &file.devices {
        if !seen.insert(device.mac.clone()) {
            return Err(FixtureError::DuplicateMac(device.mac.to_string()));
        }
    }

    Ok(file.devices)
}

/// Load fixtures from a TOML file
pub fn load_fixtures(path: &Path) -> Result<Vec<Device>, FixtureError> {
    let content = std::fs::read_to_string(path)?;
    parse_fixtures(&content)
}
