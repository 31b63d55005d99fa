//! Navigation state machine.
//!
//! Holds the currently visible screen. The machine is fully connected:
//! any screen may follow any other. Each transition is recorded in a
//! bounded log for diagnostics.

mod intent;
mod reducer;
mod state;

pub use intent::NavigationIntent;
pub use reducer::NavigationReducer;
pub use state::{NavigationState, Screen, ScreenTransition};
