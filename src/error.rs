//! Error types for store operations.

use thiserror::Error;

/// Errors returned by the application store and its reducers.
///
/// Every mutation either applies fully or fails with one of these,
/// leaving state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The caller passed a value outside the operation's accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation's preconditions do not hold for the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl StoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        StoreError::InvalidState(message.into())
    }

    /// Stable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::InvalidArgument(_) => "invalid_argument",
            StoreError::InvalidState(_) => "invalid_state",
        }
    }
}
