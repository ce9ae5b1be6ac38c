//! Base error types for hookmerge
//!
//! This module provides the foundation error type that all crates use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading a file
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a file
    #[error("Failed to write file {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target file could not be evaluated
    #[error("Failed to evaluate {}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Malformed hook descriptor
    #[error("Hook configuration error: {0}")]
    HookConfig(String),

    /// Package manifest could not be read or decoded
    #[error("Invalid manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_parse_error_display_includes_position() {
        let err = Error::Parse {
            path: PathBuf::from("config/app.php"),
            line: 3,
            column: 7,
            message: "unterminated string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to evaluate config/app.php:3:7: unterminated string"
        );
    }
}
