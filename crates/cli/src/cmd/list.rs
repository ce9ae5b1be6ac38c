//! List command implementation
//!
//! List the hooks declared in package manifests without running them.

use anyhow::Context;
use clap::{Args, ValueEnum};
use hookmerge_core::HookSource;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Output format for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListFormat {
    /// One line per hook
    #[default]
    Simple,
    /// JSON array
    Json,
}

/// List the hooks declared in package manifests
#[derive(Debug, Clone, Args)]
pub struct ListCommand {
    /// Package manifests
    #[arg(required = true, value_name = "MANIFEST")]
    pub manifests: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ListFormat::Simple)]
    pub format: ListFormat,
}

impl Command for ListCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let manifests: Vec<PathBuf> = self.manifests.iter().map(|m| context.resolve(m)).collect();
        let sources = hookmerge_config::discover(&manifests).context("Failed to read manifests")?;

        match self.format {
            ListFormat::Json => {
                let json: Vec<serde_json::Value> = sources.iter().map(to_json).collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            ListFormat::Simple => {
                if sources.is_empty() {
                    println!("{}", "No hooks found.".yellow());
                }
                for source in &sources {
                    match &source.hook {
                        Ok(hook) => {
                            println!(
                                "  • {} {} ({})",
                                hook.label().cyan(),
                                source.origin.dimmed(),
                                hook.entries.len()
                            );
                            for entry in &hook.entries {
                                println!("      {entry}");
                            }
                        }
                        Err(e) => {
                            println!("  • {} {}", source.origin.dimmed(), e.to_string().red());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn to_json(source: &HookSource) -> serde_json::Value {
    match &source.hook {
        Ok(hook) => serde_json::json!({
            "origin": source.origin,
            "key": hook.key_path,
            "file": hook.file.display().to_string(),
            "entries": hook.entries,
        }),
        Err(e) => serde_json::json!({
            "origin": source.origin,
            "error": e.to_string(),
        }),
    }
}
