//! State for the progression model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::mvi::ModelState;

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u64 = 100;

/// Level implied by an XP total: `xp / 100 + 1`.
pub fn level_for_xp(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// The session user and their progression.
///
/// Progression fields are private: `level` is derived from `xp` and only
/// the progression reducer may change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    xp: u64,
    level: u64,
    streak: u32,
    badges: BTreeSet<String>,
    last_active: Option<DateTime<Utc>>,
    pub premium: bool,
}

impl Default for User {
    fn default() -> Self {
        Self::new("", "", "Guest")
    }
}

impl ModelState for User {}

impl User {
    /// Create a user with no progress.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: display_name.into(),
            xp: 0,
            level: level_for_xp(0),
            streak: 0,
            badges: BTreeSet::new(),
            last_active: None,
            premium: false,
        }
    }

    /// Anonymous user with a fresh random id.
    pub fn guest() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), "", "Guest")
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn badges(&self) -> &BTreeSet<String> {
        &self.badges
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.contains(badge)
    }

    pub fn last_active(&self) -> Option<DateTime<Utc>> {
        self.last_active
    }

    /// XP still missing before the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        self.level.saturating_mul(XP_PER_LEVEL).saturating_sub(self.xp)
    }

    pub(super) fn set_xp(&mut self, xp: u64) {
        self.xp = xp;
        self.level = level_for_xp(xp);
    }

    pub(super) fn insert_badge(&mut self, badge: String) {
        self.badges.insert(badge);
    }

    pub(super) fn set_activity(&mut self, streak: u32, at: DateTime<Utc>) {
        self.streak = streak;
        self.last_active = Some(at);
    }

    pub(super) fn clear_progress(&mut self) {
        self.set_xp(0);
        self.streak = 0;
        self.badges.clear();
        self.last_active = None;
    }
}
