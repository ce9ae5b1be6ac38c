//! CLI command implementations

pub mod add;
pub mod apply;
pub mod list;
pub mod show;

use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};
use crate::ui;
use hookmerge_core::HookSource;
use hookmerge_engine::{BatchReport, DryRunSystem, RealSystem};
use owo_colors::OwoColorize;

/// Number of unchanged lines shown around each change in dry-run diffs
const DIFF_CONTEXT_LINES: usize = 3;

/// Run a batch, print its outcome and fail if any hook failed
///
/// With `dry_run`, writes stay in memory and are shown as diffs.
pub(crate) fn execute_batch(
    context: &RuntimeContext,
    sources: Vec<HookSource>,
    dry_run: bool,
) -> Result<BatchReport> {
    if sources.is_empty() {
        println!("{}", "No hooks found.".yellow());
        return Ok(BatchReport::default());
    }

    let report = if dry_run {
        let system = DryRunSystem::new();
        let report = context.run_hooks(&system, sources);
        print_planned_writes(context, &system);
        report
    } else {
        context.run_hooks(RealSystem, sources)
    };

    ui::print_hooks(&report);
    println!();
    println!("{}", ui::summary(&report).bold());
    if dry_run {
        println!("{}", "Dry run: no files were written.".dimmed());
    }

    if report.has_failures() {
        return Err(CommandError::HooksFailed {
            failed: report.failed(),
            total: report.hooks.len(),
        }
        .into());
    }

    Ok(report)
}

fn print_planned_writes(context: &RuntimeContext, system: &DryRunSystem) {
    for planned in system.planned_writes() {
        let name = planned
            .path
            .strip_prefix(&context.base_dir)
            .unwrap_or(&planned.path)
            .display()
            .to_string();

        let summary = ui::ChangeSummary::from_texts(&planned.original, &planned.contents);
        println!(
            "{} {} ({})",
            "Would update".bold(),
            name.cyan(),
            format!("+{}", summary.lines_added).green()
        );
        let diff = ui::unified_diff(&name, &planned.original, &planned.contents, DIFF_CONTEXT_LINES);
        println!("{}", ui::colorize(&diff));
    }
}
