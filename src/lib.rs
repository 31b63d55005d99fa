//! CyberQR client-side state engine.
//!
//! The [`store::AppStore`] composes three sub-models, each written as an
//! MVI reducer: user progression, screen navigation and the companion
//! notification queue. The [`report`] module serves the threat report
//! submission endpoint.

pub mod cli;
pub mod companion;
pub mod config;
pub mod error;
pub mod logging;
pub mod mvi;
pub mod navigation;
pub mod progression;
pub mod report;
pub mod session;
pub mod shutdown;
pub mod store;

pub use error::StoreError;
pub use store::AppStore;
