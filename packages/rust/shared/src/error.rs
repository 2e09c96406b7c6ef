//! Error types for dictbuilder.
//!
//! Library crates use [`DictError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Malformed dictionary entries are never errors: the extractor drops them and
//! carries on, so there is no variant for them here.

use std::path::PathBuf;

/// Top-level error type for all dictbuilder operations.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// Unknown book identifier, bad config file, or missing required path.
    #[error("config error: {message}")]
    Config { message: String },

    /// A required input directory or file does not exist.
    #[error("input not found: {path:?}: {message}")]
    InputNotFound { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output failed a consistency check before it was written.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DictError>;

impl DictError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Report a missing input path with a hint for the caller.
    pub fn input_not_found(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::InputNotFound {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
