//! Bluetrack Client - Backend access for the device session
//!
//! The [`Backend`] trait is the seam between the session and the scanning
//! service. [`HttpBackend`] implements it over the service's JSON REST API.

pub mod backend;
pub mod error;
pub mod http;
pub mod wire;

pub use backend::Backend;
pub use error::ClientError;
pub use http::{HttpBackend, DEFAULT_BASE_URL};
pub use wire::{decode_ack, decode_devices, MacRequest, ScanRequest};
