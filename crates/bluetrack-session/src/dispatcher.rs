//! User-triggered backend commands
//!
//! Each command runs as its own task so that a caller giving up on the
//! returned future cannot leave `scanning` or a pending device stuck.

use bluetrack_client::{Backend, ClientError};
use bluetrack_core::{ActionKind, ErrorCategory, Mac};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::Session;
use crate::state::Outcome;

impl<B: Backend> Session<B> {
    /// Run an active scan with the configured duration
    pub async fn scan_default(self: &Arc<Self>) -> Result<(), SessionError> {
        self.scan(self.config.scan_duration_secs).await
    }

    /// Run an active scan and replace the registry with its result
    ///
    /// `scanning` stays set until this scan (and any overlapping one) settles,
    /// success or failure.
    pub async fn scan(self: &Arc<Self>, duration_secs: u64) -> Result<(), SessionError> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.run_scan(duration_secs).await }).await?
    }

    /// Pair with then connect to `mac`, then refresh the device list
    ///
    /// Connect is attempted even when pairing failed. The local `connected`
    /// flag is never changed here; only the follow-up refresh updates it.
    pub async fn pair(self: &Arc<Self>, mac: Mac) -> Result<(), SessionError> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            session
                .run_action(ActionKind::Pair, mac, &[ActionKind::Pair, ActionKind::Connect])
                .await
        })
        .await?
    }

    /// Disconnect `mac`, then refresh the device list
    pub async fn disconnect(self: &Arc<Self>, mac: Mac) -> Result<(), SessionError> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            session
                .run_action(ActionKind::Disconnect, mac, &[ActionKind::Disconnect])
                .await
        })
        .await?
    }

    async fn run_scan(&self, duration_secs: u64) -> Result<(), SessionError> {
        self.update(|state| state.scanning += 1).await?;
        self.emit(SessionEvent::ScanStarted);
        info!(duration = duration_secs, "Scan started");

        let result = self.backend.scan(duration_secs).await;

        let settled = match &result {
            Ok(devices) => {
                // The backend list reflects a scan only once it completes, so
                // the scan is sequenced at completion. Polls issued while it
                // ran are older.
                let ticket = self.issue_ticket();
                info!(count = devices.len(), ticket, "Scan finished");
                self.settle(ticket, Outcome::Devices(devices.clone())).await
            }
            Err(e) => {
                // Never stale: a failed scan always reaches the user
                warn!(error = %e, "Scan failed");
                self.update(|state| state.set_error(Some(ErrorCategory::ScanFailure)))
                    .await
                    .map(|event| self.emit_opt(event))
            }
        };

        // The flag settles even after unmount
        {
            let mut state = self.state.write().await;
            state.scanning = state.scanning.saturating_sub(1);
        }
        if !self.is_disposed() {
            self.emit(SessionEvent::ScanFinished {
                success: result.is_ok(),
            });
        }

        settled?;
        result.map(|_| ()).map_err(SessionError::from)
    }

    /// Issue `steps` in order for `mac`, then refresh
    async fn run_action(
        &self,
        kind: ActionKind,
        mac: Mac,
        steps: &[ActionKind],
    ) -> Result<(), SessionError> {
        self.update(|state| state.begin_action(&mac)).await?;
        self.emit(SessionEvent::ActionStarted {
            action: kind,
            mac: mac.clone(),
        });
        info!(mac = %mac, action = %kind, "Device command started");

        let mut failure: Option<ClientError> = None;
        for step in steps {
            if let Err(e) = self.backend.action(*step, &mac).await {
                warn!(mac = %mac, step = %step, error = %e, "Device command step failed");
                failure.get_or_insert(e);
            }
        }

        // Ground truth comes from the backend, not from the command results
        if let Err(e) = self.poll_once().await {
            warn!(mac = %mac, error = %e, "Refresh after device command failed");
        }

        {
            let mut state = self.state.write().await;
            state.end_action(&mac);
        }

        let success = failure.is_none();
        if let Some(error) = &failure {
            if self.config.surface_action_errors {
                let action = match error {
                    ClientError::Rejected { action, .. } => *action,
                    _ => kind,
                };
                let category = ErrorCategory::ActionFailure {
                    action,
                    mac: mac.clone(),
                };
                if let Ok(Some(event)) = self.update(|state| state.set_error(Some(category))).await {
                    self.emit(event);
                }
            }
        }

        if !self.is_disposed() {
            self.emit(SessionEvent::ActionFinished {
                action: kind,
                mac: mac.clone(),
                success,
            });
        }
        info!(mac = %mac, action = %kind, success, "Device command finished");

        match failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}
