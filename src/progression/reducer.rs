//! Reducer for the progression model.

use crate::error::StoreError;
use crate::mvi::Reducer;

use super::intent::ProgressionIntent;
use super::state::User;

/// Reducer for XP, badge and streak transitions.
///
/// Pure function. Level-up detection and companion messages are handled
/// by the store around the dispatch call.
pub struct ProgressionReducer;

impl Reducer for ProgressionReducer {
    type State = User;
    type Intent = ProgressionIntent;
    type Error = StoreError;

    fn reduce(state: &Self::State, intent: Self::Intent) -> Result<Self::State, Self::Error> {
        match intent {
            ProgressionIntent::AddXp { amount } => {
                if amount == 0 {
                    return Err(StoreError::invalid_argument("XP amount must be positive"));
                }
                let xp = state
                    .xp()
                    .checked_add(u64::from(amount))
                    .ok_or_else(|| StoreError::invalid_argument("XP total would overflow"))?;
                let mut next = state.clone();
                next.set_xp(xp);
                Ok(next)
            }

            ProgressionIntent::AwardBadge { badge } => {
                let badge = badge.trim();
                if badge.is_empty() {
                    return Err(StoreError::invalid_argument("badge id must not be empty"));
                }
                let mut next = state.clone();
                if !next.has_badge(badge) {
                    next.insert_badge(badge.to_string());
                }
                Ok(next)
            }

            ProgressionIntent::UpdateStreak { at } => {
                let streak = match state.last_active() {
                    None => 1,
                    Some(last) if at < last => {
                        return Err(StoreError::invalid_state(format!(
                            "activity at {} is earlier than last activity at {}",
                            at.to_rfc3339(),
                            last.to_rfc3339()
                        )));
                    }
                    Some(last) => match (at.date_naive() - last.date_naive()).num_days() {
                        0 => state.streak(),
                        1 => state.streak().saturating_add(1),
                        _ => 1,
                    },
                };
                let mut next = state.clone();
                next.set_activity(streak, at);
                Ok(next)
            }

            ProgressionIntent::Reset => {
                let mut next = state.clone();
                next.clear_progress();
                Ok(next)
            }
        }
    }
}
