//! Intents for the progression model.

use chrono::{DateTime, Utc};

use crate::mvi::Intent;

/// Intents that can be dispatched to the progression reducer.
#[derive(Debug, Clone)]
pub enum ProgressionIntent {
    /// Grant experience points. Zero is rejected.
    AddXp { amount: u32 },

    /// Add a badge to the user's set. Re-awarding is a no-op.
    AwardBadge { badge: String },

    /// Record activity at the given instant and advance the daily streak.
    /// An instant before `last_active` is rejected even on the same UTC day.
    UpdateStreak { at: DateTime<Utc> },

    /// Wipe XP, level, streak and badges.
    Reset,
}

impl Intent for ProgressionIntent {}
