//! Error types for CLI commands

use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// At least one hook in a batch failed
    #[error("{failed} of {total} hooks failed")]
    HooksFailed {
        /// Number of hooks that failed
        failed: usize,
        /// Total number of hooks
        total: usize,
    },

    /// The target file of `show` does not exist
    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),
}

/// Result type for CLI operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hooks_failed_message() {
        let err = CommandError::HooksFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "2 of 5 hooks failed");
    }
}
