//! Snapshots and change signals delivered to subscribers.

use serde::Serialize;

use crate::companion::Notification;
use crate::navigation::Screen;
use crate::progression::{ScanOutcome, User};

/// Read-only copy of the store, taken at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub user: User,
    pub current_screen: Screen,
    pub notifications: NotificationsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NotificationsSnapshot {
    pub visible: Option<Notification>,
    pub queued: Vec<Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissReason {
    /// User closed the message.
    Manual,
    /// Auto-dismiss timer fired.
    Expired,
}

/// Notable side effects of one mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    LevelUp { from: u64, to: u64 },
    BadgeUnlocked { badge: String },
    ScreenChanged { from: Screen, to: Screen },
    NotificationShown { id: u64 },
    NotificationDismissed { id: u64, reason: DismissReason },
}

/// What subscribers receive after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub snapshot: AppSnapshot,
    pub signals: Vec<Signal>,
}

impl StateChange {
    pub fn has_signal(&self, predicate: impl Fn(&Signal) -> bool) -> bool {
        self.signals.iter().any(predicate)
    }

    pub fn level_up(&self) -> Option<(u64, u64)> {
        self.signals.iter().find_map(|signal| match signal {
            Signal::LevelUp { from, to } => Some((*from, *to)),
            _ => None,
        })
    }
}

/// Outcome of `AppStore::record_scan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub outcome: ScanOutcome,
    pub xp_awarded: u32,
    /// Badges that were not held before this scan.
    pub new_badges: Vec<String>,
    pub level_up: Option<(u64, u64)>,
    /// Id of the companion message describing the scan.
    pub notification_id: u64,
}
