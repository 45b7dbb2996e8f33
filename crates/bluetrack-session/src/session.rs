//! Session store and lifecycle

use bluetrack_client::{Backend, ClientError};
use bluetrack_core::ErrorCategory;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::poller::PollerHandle;
use crate::state::{Outcome, SessionSnapshot, SessionState, Settled};

/// Device session shared by the polling loop, the dispatcher, and views
pub struct Session<B: Backend> {
    pub(crate) backend: Arc<B>,
    pub(crate) config: SessionConfig,
    pub(crate) state: RwLock<SessionState>,
    next_ticket: AtomicU64,
    disposed: AtomicBool,
    events: broadcast::Sender<SessionEvent>,
}

impl<B: Backend> Session<B> {
    /// Create a session without starting the polling loop
    pub fn new(backend: Arc<B>, config: SessionConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(100);
        Arc::new(Self {
            backend,
            config,
            state: RwLock::new(SessionState::default()),
            next_ticket: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
            events,
        })
    }

    /// Create a session and start polling immediately
    pub fn mount(backend: Arc<B>, config: SessionConfig) -> SessionHandle<B> {
        let interval = config.poll_interval;
        let session = Self::new(backend, config);
        let poller = PollerHandle::start(session.clone(), interval);
        info!(interval_ms = interval.as_millis() as u64, "Session mounted");

        SessionHandle {
            session,
            poller: Some(poller),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current state for rendering
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Fetch the device list once, out of band from the polling loop
    ///
    /// The request runs as its own task, so dropping the returned future does
    /// not abandon the state update.
    pub async fn refresh(self: &Arc<Self>) -> Result<(), SessionError> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.poll_once().await }).await?
    }

    /// One device list fetch applied under the session's ordering rule
    pub(crate) async fn poll_once(&self) -> Result<(), SessionError> {
        self.ensure_active()?;
        let ticket = self.issue_ticket();

        match self.backend.fetch_devices().await {
            Ok(devices) => {
                self.settle(ticket, Outcome::Devices(devices)).await?;
                Ok(())
            }
            Err(e) => {
                debug!(ticket, error = %e, "Device list fetch failed");
                self.settle(ticket, Outcome::Failed(poll_error_category(&e)))
                    .await?;
                Err(e.into())
            }
        }
    }

    /// Mark the session disposed; later settlements are ignored
    pub(crate) fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            info!("Session unmounted");
            self.emit(SessionEvent::Unmounted);
        }
    }

    pub(crate) fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_disposed() {
            Err(SessionError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Ticket for a registry-writing request, taken when it is issued
    pub(crate) fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a settled outcome and publish the resulting events
    pub(crate) async fn settle(&self, ticket: u64, outcome: Outcome) -> Result<(), SessionError> {
        let settled = {
            let mut state = self.state.write().await;
            if self.is_disposed() {
                debug!(ticket, "Ignoring response after unmount");
                return Err(SessionError::Disposed);
            }
            state.settle(ticket, outcome, self.config.apply_policy)
        };

        match settled {
            Settled::Applied(events) => {
                for event in events {
                    self.emit(event);
                }
            }
            Settled::Stale => {
                debug!(ticket, "Dropping response older than the applied one");
                self.emit(SessionEvent::StaleResponseDropped { ticket });
            }
        }
        Ok(())
    }

    /// Run `update` on the state unless the session is disposed
    pub(crate) async fn update<R>(
        &self,
        update: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R, SessionError> {
        let mut state = self.state.write().await;
        if self.is_disposed() {
            return Err(SessionError::Disposed);
        }
        Ok(update(&mut state))
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub(crate) fn emit_opt(&self, event: Option<SessionEvent>) {
        if let Some(event) = event {
            self.emit(event);
        }
    }
}

/// Error category for a failed device list fetch
pub(crate) fn poll_error_category(error: &ClientError) -> ErrorCategory {
    match error {
        ClientError::Malformed(_) => ErrorCategory::MalformedResponse,
        ClientError::Unreachable(_) | ClientError::Rejected { .. } => {
            ErrorCategory::NetworkUnreachable
        }
    }
}

/// A mounted session; unmounting stops the polling loop
///
/// Dropping the handle cancels the polling loop and disposes the session.
pub struct SessionHandle<B: Backend> {
    session: Arc<Session<B>>,
    poller: Option<PollerHandle>,
}

impl<B: Backend> SessionHandle<B> {
    /// The shared session, for handing to other tasks
    pub fn session(&self) -> &Arc<Session<B>> {
        &self.session
    }

    /// Stop polling and dispose the session
    ///
    /// Requests already in flight are not aborted, their results are ignored.
    pub async fn unmount(mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        self.session.dispose();
    }
}

impl<B: Backend> Deref for SessionHandle<B> {
    type Target = Arc<Session<B>>;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl<B: Backend> Drop for SessionHandle<B> {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
        self.session.dispose();
    }
}
