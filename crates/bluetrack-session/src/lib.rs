//! Bluetrack Session - Client-side device session state manager
//!
//! A [`Session`] owns the device registry and the session flags. Two kinds of
//! writers touch it:
//! - the polling loop, which re-fetches the device list on a fixed interval
//! - the action dispatcher (scan, pair, disconnect)
//!
//! Readers take a [`SessionSnapshot`] and derive the list and chart from it.
//! Every registry write carries a ticket assigned when its request was
//! issued, so overlapping responses are applied according to the configured
//! [`ApplyPolicy`].

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod poller;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{ApplyPolicy, SessionConfig};
pub use error::SessionError;
pub use events::SessionEvent;
pub use poller::PollerHandle;
pub use session::{Session, SessionHandle};
pub use state::SessionSnapshot;
