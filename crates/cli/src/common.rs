//! Common utilities and types shared across CLI commands

use anyhow::{Context, Result};
use hookmerge_config::Config;
use hookmerge_core::HookSource;
use hookmerge_engine::{BatchReport, HookRunner, MergeOptions, System, TracingDiagnostics};
use std::path::{Path, PathBuf};

/// Runtime context for CLI commands
///
/// Holds the loaded configuration with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Loaded configuration
    pub config: Config,
    /// Directory relative hook paths are resolved against
    pub base_dir: PathBuf,
    /// Emit diagnostic trace lines for every hook
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a context from a configuration and overrides
    pub fn new(config: Config, base_dir: PathBuf, verbose: bool) -> Self {
        Self {
            config,
            base_dir,
            verbose,
        }
    }

    /// Merge options from the `[merge]` section
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            match_indent: self.config.merge.match_indent,
            class_constants: self.config.merge.class_constants,
        }
    }

    /// Resolve a path given on the command line
    pub fn resolve(&self, path: &Path) -> PathBuf {
        hookmerge_config::resolve_path(path, &self.base_dir)
    }

    /// Run a batch of hooks on `system`
    ///
    /// Diagnostic trace lines are forwarded to the log when verbose.
    pub fn run_hooks<S>(&self, system: S, sources: Vec<HookSource>) -> BatchReport
    where
        S: System + Clone,
    {
        let builder = HookRunner::builder()
            .system(system)
            .base_dir(&self.base_dir)
            .options(self.merge_options());

        if self.verbose {
            builder.diagnostics(TracingDiagnostics).build().run(sources)
        } else {
            builder.build().run(sources)
        }
    }
}

/// Load the configuration file
///
/// An explicit path must exist; otherwise `hookmerge.toml` in `cwd` is used
/// when present.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display())),
        None => Config::load_from_dir(cwd).context("Failed to load configuration"),
    }
}
