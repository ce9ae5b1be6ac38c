//! Logging configuration for the hookmerge CLI
//!
//! Compact terminal output on stderr plus an optional plain-text log file,
//! both driven by `tracing`.

use crate::Result;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a level
fn default_directive(level: &str) -> String {
    format!("hookmerge={level},hookmerge_engine={level},hookmerge_config={level}")
}

/// Initialize the logging system
///
/// `RUST_LOG` overrides the default filter.
///
/// # Arguments
/// * `verbose` - Enable debug level logging
/// * `log_file` - Optional path to append logs to
///
/// # Examples
/// ```ignore
/// init(false, None)?;
/// init(true, Some(Path::new("merge.log")))?;
/// ```
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level)))
        .map_err(|e| hookmerge_core::Error::Config(format!("Invalid log filter: {e}")))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .compact()
        .with_ansi(true)
        .with_filter(env_filter);

    let file_layer = match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|e| hookmerge_core::Error::FileWrite {
                    path: log_path.to_path_buf(),
                    source: e,
                })?;

            let file_filter = EnvFilter::try_new(default_directive("debug"))
                .map_err(|e| hookmerge_core::Error::Config(format!("Invalid log filter: {e}")))?;

            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(file_filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| hookmerge_core::Error::Message(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_all_crates() {
        let directive = default_directive("debug");
        assert!(directive.contains("hookmerge=debug"));
        assert!(directive.contains("hookmerge_engine=debug"));
        assert!(directive.contains("hookmerge_config=debug"));
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
