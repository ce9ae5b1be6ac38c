//! Hookmerge CLI library
//!
//! This library contains all the CLI logic for hookmerge, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

/// Hookmerge - merge package-declared entries into config files
#[derive(Parser)]
#[command(name = "hookmerge")]
#[command(about = "Merge package-declared entries into config files")]
#[command(version)]
#[command(long_about = "Merge package-declared entries into config files

Packages declare hooks under extra.hooks in their manifest. Each hook names a
config file, a dotted key path and the entries that must be present in the
array at that path. Missing entries are inserted right after the last existing
entry; the rest of the file is left byte for byte untouched.")]
pub struct Cli {
    /// Path to the config file (default: ./hookmerge.toml when present)
    #[arg(long, env = "HOOKMERGE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory relative hook paths are resolved against
    #[arg(long, env = "HOOKMERGE_BASE_DIR", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Enable verbose output (DEBUG logs and per-hook trace lines)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file
    #[arg(long, env = "HOOKMERGE_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the hookmerge CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Merge the hooks declared in package manifests
    Apply(cmd::apply::ApplyCommand),

    /// Merge a single hook given on the command line
    Add(cmd::add::AddCommand),

    /// Print the value stored at a key path as JSON
    Show(cmd::show::ShowCommand),

    /// List the hooks declared in package manifests
    List(cmd::list::ListCommand),
}

/// Main entry point for the CLI logic
pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let context = build_context(&cli, &cwd)?;

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| context.config.general.log_file.clone());
    hookmerge_config::logging::init(context.verbose, log_file.as_deref())?;

    tracing::debug!(base_dir = %context.base_dir.display(), "Starting");
    execute_command(cli.command, &context)
}

/// Load configuration and apply command-line overrides
fn build_context(cli: &Cli, cwd: &std::path::Path) -> Result<RuntimeContext> {
    let config = common::load_config(cli.config.as_deref(), cwd)?;

    let base_dir = match &cli.base_dir {
        Some(dir) => hookmerge_config::resolve_path(dir, cwd),
        None => config.base_dir(cwd),
    };
    let verbose = cli.verbose || config.general.verbose;

    Ok(RuntimeContext::new(config, base_dir, verbose))
}

fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Apply(cmd) => cmd.execute(context),
        Commands::Add(cmd) => cmd.execute(context),
        Commands::Show(cmd) => cmd.execute(context),
        Commands::List(cmd) => cmd.execute(context),
    }
}
