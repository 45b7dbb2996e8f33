//! Bluetrack Core - Device types, registry, and view projections
//!
//! This crate provides the foundational types for the Bluetrack client:
//! - Device model as reported by the scanning backend
//! - Device registry holding the latest complete device list
//! - User-visible error categories
//! - Chart and list projections derived from a registry snapshot

pub mod chart;
pub mod connection;
pub mod device;
pub mod error;
pub mod registry;
pub mod view;

pub use chart::{project_chart, ChartPoint, ChartSeries, CHART_SERIES_NAME};
pub use connection::ConnectionState;
pub use device::{Device, Mac};
pub use error::{ActionKind, ErrorCategory};
pub use registry::Registry;
pub use view::{project_list, DeviceAction, DeviceRow, ScanButton, UNKNOWN_DEVICE_NAME};
