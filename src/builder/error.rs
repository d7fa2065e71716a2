//! Build errors for the history builder.

use thiserror::Error;

/// Errors that can occur when building a history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Platform binding not specified. Call .adapter(adapter) before .build()")]
    MissingAdapter,

    #[error("Basename not specified. Call .basename(prefix) before .build_with_basename()")]
    MissingBasename,

    #[error("Basename \"{0}\" must start with '/'")]
    InvalidBasename(String),
}
