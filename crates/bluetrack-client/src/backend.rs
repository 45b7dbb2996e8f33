use bluetrack_core::{ActionKind, Device, Mac};
use std::future::Future;

use crate::error::ClientError;

/// Operations the session needs from the scanning service
pub trait Backend: Send + Sync + 'static {
    /// Fetch the full current device list
    fn fetch_devices(&self) -> impl Future<Output = Result<Vec<Device>, ClientError>> + Send;

    /// Run an active scan and return the resulting device list
    fn scan(
        &self,
        duration_secs: u64,
    ) -> impl Future<Output = Result<Vec<Device>, ClientError>> + Send;

    /// Issue a single device command
    fn action(
        &self,
        action: ActionKind,
        mac: &Mac,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
