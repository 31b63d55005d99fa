//! Screen enumeration and navigation state.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::mvi::ModelState;

/// Every screen the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Home,
    Scan,
    Icsa,
    Profile,
    Report,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Home,
        Screen::Scan,
        Screen::Icsa,
        Screen::Profile,
        Screen::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Scan => "scan",
            Screen::Icsa => "icsa",
            Screen::Profile => "profile",
            Screen::Report => "report",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| StoreError::invalid_argument(format!("unknown screen '{}'", s)))
    }
}

/// Log entry for a screen change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenTransition {
    pub from: Screen,
    pub to: Screen,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    current: Screen,
    transitions: VecDeque<ScreenTransition>,
    history_limit: usize,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::with_history_limit(50)
    }
}

impl ModelState for NavigationState {}

impl NavigationState {
    /// Start on the home screen, keeping at most `history_limit` transitions.
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            current: Screen::Home,
            transitions: VecDeque::new(),
            history_limit: history_limit.max(1),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Recorded transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &ScreenTransition> {
        self.transitions.iter()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub(super) fn record(&mut self, to: Screen, at: DateTime<Utc>) {
        if self.transitions.len() == self.history_limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(ScreenTransition {
            from: self.current,
            to,
            at,
        });
        self.current = to;
    }
}
