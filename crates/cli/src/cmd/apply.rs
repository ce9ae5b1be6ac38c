//! Apply command implementation
//!
//! Merge the hooks declared in package manifests.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Merge the hooks declared in package manifests
#[derive(Debug, Clone, Args)]
pub struct ApplyCommand {
    /// Package manifests (composer.json or composer.lock style)
    #[arg(required = true, value_name = "MANIFEST")]
    pub manifests: Vec<PathBuf>,

    /// Show what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Command for ApplyCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let manifests: Vec<PathBuf> = self.manifests.iter().map(|m| context.resolve(m)).collect();
        let sources = hookmerge_config::discover(&manifests).context("Failed to read manifests")?;
        tracing::debug!(count = sources.len(), "Discovered hooks");

        super::execute_batch(context, sources, self.dry_run)?;
        Ok(())
    }
}
