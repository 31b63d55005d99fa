//! Reducer for the navigation state machine.

use crate::error::StoreError;
use crate::mvi::Reducer;

use super::intent::NavigationIntent;
use super::state::NavigationState;

pub struct NavigationReducer;

impl Reducer for NavigationReducer {
    type State = NavigationState;
    type Intent = NavigationIntent;
    type Error = StoreError;

    fn reduce(state: &Self::State, intent: Self::Intent) -> Result<Self::State, Self::Error> {
        match intent {
            // Fully connected: every target is reachable, including the current screen.
            NavigationIntent::Navigate { target, at } => {
                let mut next = state.clone();
                next.record(target, at);
                Ok(next)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Screen;
    use chrono::Utc;

    fn navigate(state: &NavigationState, target: Screen) -> NavigationState {
        NavigationReducer::reduce(
            state,
            NavigationIntent::Navigate {
                target,
                at: Utc::now(),
            },
        )
        .unwrap()
    }

    #[test]
    fn navigate_changes_current_and_records() {
        let state = navigate(&NavigationState::default(), Screen::Scan);
        assert_eq!(state.current(), Screen::Scan);
        let log: Vec<_> = state.transitions().collect();
        assert_eq!(log.len(), 1);
        assert_eq!((log[0].from, log[0].to), (Screen::Home, Screen::Scan));
    }

    #[test]
    fn navigate_to_same_screen_is_recorded() {
        let state = navigate(&NavigationState::default(), Screen::Home);
        assert_eq!(state.current(), Screen::Home);
        assert_eq!(state.transitions().count(), 1);
    }

    #[test]
    fn log_is_bounded_and_drops_oldest() {
        let mut state = NavigationState::with_history_limit(2);
        for target in [Screen::Scan, Screen::Icsa, Screen::Profile] {
            state = navigate(&state, target);
        }
        let log: Vec<_> = state.transitions().map(|t| (t.from, t.to)).collect();
        assert_eq!(
            log,
            vec![(Screen::Scan, Screen::Icsa), (Screen::Icsa, Screen::Profile)]
        );
    }
}
