//! Bluetrack Mock - In-memory stand-in for the scanning backend
//!
//! Serves the same five JSON endpoints as the real scanning service over a
//! device list held in memory. Used by the client and session tests, and as a
//! development backend for the `bluetrack` binary.

pub mod api;
pub mod fixtures;
pub mod server;
pub mod state;

pub use fixtures::{load_fixtures, parse_fixtures, FixtureError};
pub use server::{router, run, spawn};
pub use state::{Behavior, MockState, RecordedRequest};
