//! Model-View-Intent primitives shared by every state model.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ AppStore ──→ subscribers
//!    ↑                                              │
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! Reducers borrow the current state and either return the next one or
//! reject the intent. The store applies the result, so a rejected intent
//! never leaves a half-updated model behind.

/// Event fed to a reducer: a tap, a scan result, a timer firing.
pub trait Intent: Send + 'static {}

/// Snapshot-able state of one sub-model.
///
/// Cloned into drafts and compared after dispatch to decide whether
/// subscribers need to hear about the change.
pub trait ModelState: Clone + PartialEq + Default + Send + 'static {}

/// Validated state transition for one sub-model.
pub trait Reducer {
    type State: ModelState;
    type Intent: Intent;
    /// Why an intent was rejected.
    type Error;

    fn reduce(state: &Self::State, intent: Self::Intent) -> Result<Self::State, Self::Error>;
}
