//! Show command implementation
//!
//! Print the collection currently stored at a key path.

use anyhow::Context;
use clap::Args;
use hookmerge_engine::{RealSystem, StructureLoader};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Print the value stored at a key path as JSON
#[derive(Debug, Clone, Args)]
pub struct ShowCommand {
    /// Dotted key path
    #[arg(short, long)]
    pub key: String,

    /// Target file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl Command for ShowCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let path = context.resolve(&self.file);
        let loaded = StructureLoader::new(RealSystem)
            .open(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?
            .ok_or_else(|| CommandError::FileNotFound(path.clone()))?;

        match loaded.lookup(&self.key) {
            Some(value) => {
                println!("{}", serde_json::to_string_pretty(&value.to_json())?);
            }
            None => {
                eprintln!(
                    "{}",
                    format!("Key '{}' not found in {}", self.key, path.display()).yellow()
                );
            }
        }

        Ok(())
    }
}
