//! Reducer for the companion scheduler.

use std::convert::Infallible;

use crate::mvi::Reducer;

use super::intent::CompanionIntent;
use super::state::CompanionState;

/// Reducer for the visible slot and queue.
///
/// Pure function. Arming and cancelling dismissal timers is handled by
/// the store, which compares the visible id before and after dispatch.
pub struct CompanionReducer;

impl Reducer for CompanionReducer {
    type State = CompanionState;
    type Intent = CompanionIntent;
    type Error = Infallible;

    fn reduce(state: &Self::State, intent: Self::Intent) -> Result<Self::State, Self::Error> {
        let mut next = state.clone();
        match intent {
            CompanionIntent::Enqueue { notification } => next.push(notification),
            CompanionIntent::DismissCurrent => {
                next.take_visible();
            }
            CompanionIntent::Expire { id } => {
                // Stale timer: the notification it was armed for is already gone
                if next.visible().is_some_and(|n| n.id == id) {
                    next.take_visible();
                }
            }
        }
        Ok(next)
    }
}
