//! Companion notification scheduler.
//!
//! Serializes requests to "speak" into a single visible message at a time.
//! Later requests wait in a FIFO queue.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Visible slot + queue
//! - `intent.rs` - Enqueue, DismissCurrent, Expire
//! - `reducer.rs` - State transitions (pure, no side effects)
//! - `timer.rs` - Cancellable dismissal timers, armed by the store around dispatch

mod intent;
mod reducer;
mod state;
pub mod timer;

pub use intent::CompanionIntent;
pub use reducer::CompanionReducer;
pub use state::{CompanionState, Notification};
pub use timer::{DismissScheduler, ManualScheduler, TimerHandle, TokioScheduler};
