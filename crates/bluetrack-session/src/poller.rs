//! Recurring device list fetch

use bluetrack_client::Backend;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::session::Session;

/// Handle to a running polling loop
///
/// The first fetch is issued immediately, then one per interval. Each fetch
/// runs as its own task, so a slow response overlaps with later ticks instead
/// of delaying them. Dropping the handle cancels the loop.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn start<B: Backend>(session: Arc<Session<B>>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = period.as_millis() as u64, "Polling loop started");

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let session = session.clone();
                        tokio::spawn(async move {
                            match session.poll_once().await {
                                Ok(()) => {}
                                Err(SessionError::Disposed) => {}
                                Err(e) => debug!(error = %e, "Scheduled poll failed"),
                            }
                        });
                    }
                }
            }

            debug!("Polling loop stopped");
        });

        Self { cancel, task }
    }

    /// Cancel the timer without waiting for the loop to exit
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel the timer and wait for the loop to exit
    pub async fn stop(mut self) {
        self.cancel.cancel();
        // The loop only exits through cancellation
        let _ = (&mut self.task).await;
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
