//! Intents for the companion scheduler.

use crate::mvi::Intent;

use super::state::Notification;

#[derive(Debug, Clone)]
pub enum CompanionIntent {
    /// Show now if the slot is free, otherwise queue.
    Enqueue { notification: Notification },

    /// User closed the visible message. No-op when nothing is visible.
    DismissCurrent,

    /// Dismissal timer fired for `id`.
    /// Ignored unless `id` is still the visible notification.
    Expire { id: u64 },
}

impl Intent for CompanionIntent {}
