//! User progression model.
//!
//! Tracks XP, level, daily streak and badges for the session user.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - The `User` record and the XP-to-level function
//! - `intent.rs` - Progression events (AddXp, AwardBadge, UpdateStreak, Reset)
//! - `reducer.rs` - Validated state transitions (pure, no side effects)
//! - `rewards.rs` - Translation of scan outcomes into XP, badges and tips

mod intent;
mod reducer;
pub mod rewards;
mod state;

pub use intent::ProgressionIntent;
pub use reducer::ProgressionReducer;
pub use rewards::{badges, ScanOutcome};
pub use state::{level_for_xp, User, XP_PER_LEVEL};
