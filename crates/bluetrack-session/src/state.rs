//! Session state and its sequencing rules

use bluetrack_core::{
    project_chart, project_list, ChartSeries, Device, DeviceRow, ErrorCategory, Mac, Registry,
    ScanButton,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::config::ApplyPolicy;
use crate::events::SessionEvent;

/// Result of a registry-writing request
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Devices(Vec<Device>),
    Failed(ErrorCategory),
}

#[derive(Debug, PartialEq)]
pub(crate) enum Settled {
    /// Outcome applied; these events describe the change
    Applied(Vec<SessionEvent>),
    /// A newer outcome was already applied
    Stale,
}

/// Mutable session state, guarded by the session lock
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) registry: Registry,
    pub(crate) scanning: usize,
    pub(crate) last_error: Option<ErrorCategory>,
    pub(crate) last_refreshed: Option<DateTime<Utc>>,
    /// MAC -> number of device command sequences in flight
    pub(crate) pending: HashMap<Mac, usize>,
    /// Listed MACs that an applied list has reported connected
    pub(crate) seen_connected: HashSet<Mac>,
    last_applied_ticket: u64,
}

impl SessionState {
    /// Apply a settled fetch or scan outcome issued with `ticket`
    pub(crate) fn settle(&mut self, ticket: u64, outcome: Outcome, policy: ApplyPolicy) -> Settled {
        if policy == ApplyPolicy::LastIssued && ticket <= self.last_applied_ticket {
            return Settled::Stale;
        }
        self.last_applied_ticket = self.last_applied_ticket.max(ticket);

        let mut events = Vec::new();
        match outcome {
            Outcome::Devices(devices) => {
                // Only devices still listed keep their connection history
                let listed: HashSet<&Mac> = devices.iter().map(|d| &d.mac).collect();
                self.seen_connected.retain(|mac| listed.contains(mac));
                self.seen_connected.extend(
                    devices
                        .iter()
                        .filter(|d| d.connected)
                        .map(|d| d.mac.clone()),
                );
                self.registry.replace_all(devices);
                self.last_refreshed = Some(Utc::now());
                events.push(SessionEvent::DevicesReplaced {
                    count: self.registry.len(),
                    revision: self.registry.revision(),
                });
                events.extend(self.set_error(None));
            }
            Outcome::Failed(category) => {
                events.extend(self.set_error(Some(category)));
            }
        }
        Settled::Applied(events)
    }

    /// Overwrite the session error, returning an event if it changed
    pub(crate) fn set_error(&mut self, error: Option<ErrorCategory>) -> Option<SessionEvent> {
        if self.last_error == error {
            return None;
        }
        self.last_error = error.clone();
        Some(SessionEvent::ErrorChanged(error))
    }

    pub(crate) fn begin_action(&mut self, mac: &Mac) {
        *self.pending.entry(mac.clone()).or_insert(0) += 1;
    }

    pub(crate) fn end_action(&mut self, mac: &Mac) {
        if let Some(count) = self.pending.get_mut(mac) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(mac);
            }
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            devices: self.registry.snapshot(),
            revision: self.registry.revision(),
            scanning: self.scanning > 0,
            last_error: self.last_error.clone(),
            last_refreshed: self.last_refreshed,
            pending: self.pending.keys().cloned().collect(),
            seen_connected: self.seen_connected.clone(),
        }
    }
}

/// Read-only copy of the session for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub devices: Vec<Device>,
    pub revision: u64,
    pub scanning: bool,
    pub last_error: Option<ErrorCategory>,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub pending: HashSet<Mac>,
    pub seen_connected: HashSet<Mac>,
}

impl SessionSnapshot {
    /// Device list rows
    pub fn rows(&self) -> Vec<DeviceRow> {
        project_list(&self.devices, &self.pending, &self.seen_connected)
    }

    /// Distance chart series
    pub fn chart(&self) -> ChartSeries {
        project_chart(&self.devices)
    }

    pub fn scan_button(&self) -> ScanButton {
        ScanButton::for_scanning(self.scanning)
    }

    /// User-visible error message
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices(macs: &[&str]) -> Vec<Device> {
        macs.iter().map(|m| Device::new(*m)).collect()
    }

    #[test]
    fn test_success_replaces_and_clears_error() {
        let mut state = SessionState::default();
        state.set_error(Some(ErrorCategory::NetworkUnreachable));

        let settled = state.settle(1, Outcome::Devices(devices(&["AA:BB"])), ApplyPolicy::LastIssued);

        assert_eq!(
            settled,
            Settled::Applied(vec![
                SessionEvent::DevicesReplaced {
                    count: 1,
                    revision: 1
                },
                SessionEvent::ErrorChanged(None),
            ])
        );
        assert_eq!(state.last_error, None);
        assert!(state.last_refreshed.is_some());
    }

    #[test]
    fn test_failure_keeps_registry() {
        let mut state = SessionState::default();
        state.settle(1, Outcome::Devices(devices(&["AA:BB"])), ApplyPolicy::LastIssued);
        state.settle(
            2,
            Outcome::Failed(ErrorCategory::MalformedResponse),
            ApplyPolicy::LastIssued,
        );

        assert_eq!(state.registry.snapshot(), devices(&["AA:BB"]));
        assert_eq!(state.last_error, Some(ErrorCategory::MalformedResponse));
    }

    #[test]
    fn test_last_issued_drops_older_outcomes() {
        let mut state = SessionState::default();
        let newer = state.settle(2, Outcome::Devices(devices(&["NEW"])), ApplyPolicy::LastIssued);
        let older = state.settle(1, Outcome::Devices(devices(&["OLD"])), ApplyPolicy::LastIssued);

        assert!(matches!(newer, Settled::Applied(_)));
        assert_eq!(older, Settled::Stale);
        assert_eq!(state.registry.snapshot(), devices(&["NEW"]));
    }

    #[test]
    fn test_last_issued_drops_older_errors() {
        let mut state = SessionState::default();
        state.settle(2, Outcome::Devices(devices(&["NEW"])), ApplyPolicy::LastIssued);
        let older = state.settle(
            1,
            Outcome::Failed(ErrorCategory::NetworkUnreachable),
            ApplyPolicy::LastIssued,
        );

        assert_eq!(older, Settled::Stale);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_last_completed_applies_in_completion_order() {
        let mut state = SessionState::default();
        state.settle(2, Outcome::Devices(devices(&["NEW"])), ApplyPolicy::LastCompleted);
        let older = state.settle(1, Outcome::Devices(devices(&["OLD"])), ApplyPolicy::LastCompleted);

        assert!(matches!(older, Settled::Applied(_)));
        assert_eq!(state.registry.snapshot(), devices(&["OLD"]));
    }

    #[test]
    fn test_seen_connected_drives_disconnected_state() {
        let mut state = SessionState::default();
        let connected = vec![Device::new("AA:BB").with_connected(true)];
        state.settle(1, Outcome::Devices(connected), ApplyPolicy::LastIssued);
        state.settle(2, Outcome::Devices(devices(&["AA:BB"])), ApplyPolicy::LastIssued);

        let rows = state.snapshot().rows();
        assert_eq!(rows[0].state, bluetrack_core::ConnectionState::Disconnected);
    }

    #[test]
    fn test_seen_connected_forgets_unlisted_devices() {
        let mut state = SessionState::default();
        let connected = vec![Device::new("AA:BB").with_connected(true)];
        state.settle(1, Outcome::Devices(connected), ApplyPolicy::LastIssued);
        state.settle(2, Outcome::Devices(devices(&["CC:DD"])), ApplyPolicy::LastIssued);
        assert!(state.seen_connected.is_empty());

        state.settle(3, Outcome::Devices(devices(&["AA:BB"])), ApplyPolicy::LastIssued);
        let rows = state.snapshot().rows();
        assert_eq!(rows[0].state, bluetrack_core::ConnectionState::Discovered);
    }

    #[test]
    fn test_pending_counts_overlapping_actions() {
        let mut state = SessionState::default();
        let mac = Mac::from("AA:BB");
        state.begin_action(&mac);
        state.begin_action(&mac);
        state.end_action(&mac);
        assert!(state.snapshot().pending.contains(&mac));

        state.end_action(&mac);
        assert!(state.snapshot().pending.is_empty());
    }

    #[test]
    fn test_unchanged_error_emits_nothing() {
        let mut state = SessionState::default();
        assert!(state.set_error(Some(ErrorCategory::ScanFailure)).is_some());
        assert!(state.set_error(Some(ErrorCategory::ScanFailure)).is_none());
        assert!(state.set_error(None).is_some());
    }

    #[test]
    fn test_snapshot_projections() {
        let mut state = SessionState::default();
        state.settle(
            1,
            Outcome::Devices(vec![Device::new("AA:BB").with_name("Earbuds").with_distance(1.2)]),
            ApplyPolicy::LastIssued,
        );
        state.scanning = 1;
        state.set_error(Some(ErrorCategory::ScanFailure));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows()[0].distance, "Distance: 1.2 m");
        assert_eq!(snapshot.chart().points[0].value, 1.2);
        assert_eq!(snapshot.scan_button().label, "Scanning...");
        assert_eq!(snapshot.error_message().as_deref(), Some("Scan failed"));
    }
}
