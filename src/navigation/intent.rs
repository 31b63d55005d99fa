//! Intents for the navigation state machine.

use chrono::{DateTime, Utc};

use crate::mvi::Intent;

use super::state::Screen;

#[derive(Debug, Clone)]
pub enum NavigationIntent {
    /// Make `target` the current screen.
    Navigate { target: Screen, at: DateTime<Utc> },
}

impl Intent for NavigationIntent {}
