//! reqwest implementation of [`Backend`]

use anyhow::{Context, Result};
use bluetrack_core::{ActionKind, Device, Mac};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::wire::{decode_ack, decode_devices, MacRequest, ScanRequest};

/// Where the scanning service listens unless configured otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Backend reached over the service's JSON REST API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_devices(&self, response: reqwest::Response) -> Result<Vec<Device>, ClientError> {
        // Status is not inspected; the body alone decides.
        let body = response.bytes().await?;
        decode_devices(&body)
    }
}

impl Backend for HttpBackend {
    async fn fetch_devices(&self) -> Result<Vec<Device>, ClientError> {
        let url = self.url("/api/devices");
        debug!(url = %url, "Fetching device list");

        let response = self.client.get(&url).send().await?;
        let devices = self.read_devices(response).await?;

        debug!(count = devices.len(), "Fetched device list");
        Ok(devices)
    }

    async fn scan(&self, duration_secs: u64) -> Result<Vec<Device>, ClientError> {
        let url = self.url("/api/scan");
        debug!(url = %url, duration = duration_secs, "Requesting scan");

        let response = self
            .client
            .post(&url)
            .json(&ScanRequest {
                duration: duration_secs,
            })
            .send()
            .await?;
        let devices = self.read_devices(response).await?;

        debug!(count = devices.len(), "Scan returned devices");
        Ok(devices)
    }

    async fn action(&self, action: ActionKind, mac: &Mac) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/{}", action.as_str()));
        debug!(url = %url, mac = %mac, "Sending device command");

        let response = self
            .client
            .post(&url)
            .json(&MacRequest { mac: mac.clone() })
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        let result = decode_ack(action, mac, status, &body);
        if let Err(e) = &result {
            warn!(mac = %mac, action = %action, error = %e, "Device command failed");
        }
        result
    }
}
