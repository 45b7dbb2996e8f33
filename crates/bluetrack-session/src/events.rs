//! Session events for views that re-render on change

use bluetrack_core::{ActionKind, ErrorCategory, Mac};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Registry replaced by a fetch or scan response
    DevicesReplaced { count: usize, revision: u64 },
    /// Session error set or cleared
    ErrorChanged(Option<ErrorCategory>),
    /// Scan request issued
    ScanStarted,
    /// Scan request settled
    ScanFinished { success: bool },
    /// Device command sequence started
    ActionStarted { action: ActionKind, mac: Mac },
    /// Device command sequence and its follow-up refresh settled
    ActionFinished {
        action: ActionKind,
        mac: Mac,
        success: bool,
    },
    /// Response settled after a newer one and was ignored
    StaleResponseDropped { ticket: u64 },
    /// Session unmounted; no further events follow
    Unmounted,
}
