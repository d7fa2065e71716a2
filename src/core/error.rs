//! Error types for location construction and platform bindings.

use thiserror::Error;

/// Errors surfaced by the history core.
///
/// A vetoed or declined navigation is not an error; it is reported through [`TransitionStatus`](crate::history::TransitionStatus).
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(
        "Pathname \"{pathname}\" could not be decoded. \
         This is likely caused by an invalid percent-encoding."
    )]
    PathDecoding { pathname: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Errors raised by a platform binding while moving the native stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("Cannot go({delta}) from index {index}: not enough history (length {len})")]
    OutOfRange {
        delta: isize,
        index: usize,
        len: usize,
    },

    #[error("Platform rejected the navigation: {0}")]
    Rejected(String),

    #[error("Platform history is unavailable: {0}")]
    Unavailable(String),
}
