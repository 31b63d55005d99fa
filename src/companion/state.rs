//! State for the companion scheduler.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::mvi::ModelState;

/// A message for the pet companion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Auto-dismiss interval. `None` means it stays until dismissed by hand.
    #[serde(rename = "durationMs", serialize_with = "serialize_duration_ms")]
    pub duration: Option<Duration>,
}

fn serialize_duration_ms<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match duration {
        Some(d) => {
            let millis = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
            serializer.serialize_some(&millis)
        }
        None => serializer.serialize_none(),
    }
}

/// Visible slot plus FIFO queue.
///
/// At most one notification is visible. The queue is only non-empty
/// while something is visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompanionState {
    visible: Option<Notification>,
    queue: VecDeque<Notification>,
}

impl ModelState for CompanionState {}

impl CompanionState {
    pub fn visible(&self) -> Option<&Notification> {
        self.visible.as_ref()
    }

    /// Waiting notifications, next first.
    pub fn queued(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.visible.is_none()
    }

    pub(super) fn push(&mut self, notification: Notification) {
        if self.visible.is_none() {
            self.visible = Some(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    pub(super) fn take_visible(&mut self) -> Option<Notification> {
        let dismissed = self.visible.take();
        self.visible = self.queue.pop_front();
        dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let state = CompanionState::default();
        assert!(state.is_idle());
        assert_eq!(state.queue_len(), 0);
    }

    #[test]
    fn duration_serializes_as_millis() {
        let notification = Notification {
            id: 1,
            text: "hi".to_string(),
            created_at: Utc::now(),
            duration: Some(Duration::from_millis(1500)),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["durationMs"], 1500);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn oversized_duration_saturates() {
        let notification = Notification {
            id: 2,
            text: "forever".to_string(),
            created_at: Utc::now(),
            duration: Some(Duration::MAX),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["durationMs"], u64::MAX);
    }
}
