//! Add command implementation
//!
//! Merge a single hook given on the command line.

use clap::Args;
use hookmerge_core::{Entry, Hook, HookSource};
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Merge a single hook given on the command line
#[derive(Debug, Clone, Args)]
pub struct AddCommand {
    /// Dotted key path of the collection
    #[arg(short, long)]
    pub key: String,

    /// Target file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Entry to ensure present; `name=VALUE` adds a keyed entry
    #[arg(short, long = "entry", value_name = "ENTRY", required = true)]
    pub entries: Vec<String>,

    /// Show what would change without writing the file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl AddCommand {
    /// Build the hook described by the arguments
    pub fn hook(&self) -> Hook {
        Hook::new(
            self.key.clone(),
            self.file.clone(),
            self.entries.iter().map(|e| Entry::parse(e)).collect(),
        )
    }
}

impl Command for AddCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let source = HookSource::new("cli", self.hook());
        super::execute_batch(context, vec![source], self.dry_run)?;
        Ok(())
    }
}
