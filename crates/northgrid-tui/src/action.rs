//! UI actions. Every state change goes through one of these.

use northgrid_core::{CoreError, CustomerRecord, ListTicket, MutationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast shown above the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──
    ToggleHelp,
    Notify(Notification),

    // ── Data ──
    /// Re-fetch the customer list.
    Refresh,
    /// A list fetch finished. Stale tickets are dropped by the view.
    ListLoaded {
        ticket: ListTicket,
        result: Result<Vec<CustomerRecord>, CoreError>,
    },
    /// The in-flight create/update/delete finished.
    MutationFinished(Result<MutationOutcome, CoreError>),
}
