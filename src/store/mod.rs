//! Application store: the composition root for progression, navigation
//! and the companion scheduler.
//!
//! The store is constructed explicitly per session and passed to whoever
//! needs it; there is no global instance. All mutation goes through its
//! methods, and subscribers see a fresh snapshot after each change.

mod events;
mod listeners;
mod state;

pub use events::{AppSnapshot, DismissReason, NotificationsSnapshot, ScanResult, Signal, StateChange};
pub use listeners::{Listener, Subscription};
pub use state::{AppStore, StoreSettings};
