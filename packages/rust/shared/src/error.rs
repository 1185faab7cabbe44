//! Error types for DashPrep.
//!
//! Library crates use [`DashPrepError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Missing or malformed *cell values* are never errors — they degrade to
//! per-field defaults at the input boundary. Only whole-dataset failures
//! (file unreadable, structurally broken table) surface here.

use std::path::PathBuf;

/// Top-level error type for all DashPrep operations.
#[derive(Debug, thiserror::Error)]
pub enum DashPrepError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// An input dataset could not be loaded at all.
    #[error("input error at {path:?}: {message}")]
    Input { path: PathBuf, message: String },

    /// Tabular parsing error (broken CSV structure, undecodable record).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (schema mismatch, malformed dataset, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DashPrepError>;

impl DashPrepError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an input error carrying the dataset path.
    pub fn input(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DashPrepError::config("missing target year");
        assert_eq!(err.to_string(), "config error: missing target year");

        let err = DashPrepError::validation("schema_version 99 not supported");
        assert!(err.to_string().contains("schema_version 99"));
    }

    #[test]
    fn input_error_carries_path() {
        let err = DashPrepError::input("ntis_results.csv", "no such file");
        let text = err.to_string();
        assert!(text.contains("ntis_results.csv"));
        assert!(text.contains("no such file"));
    }
}
