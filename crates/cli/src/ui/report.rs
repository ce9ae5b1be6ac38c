//! Per-hook outcome output

use hookmerge_core::Entry;
use hookmerge_engine::{BatchReport, HookOutcome, HookReport};
use owo_colors::OwoColorize;

/// Status marker and plain description of one outcome
pub fn describe(outcome: &HookOutcome) -> (&'static str, String) {
    match outcome {
        HookOutcome::Merged { appended, .. } => ("+", format!("added {}", entry_list(appended))),
        HookOutcome::Unchanged => ("=", "up to date".to_string()),
        HookOutcome::Skipped(reason) => ("-", format!("skipped: {reason}")),
        HookOutcome::Failed(e) => ("!", format!("failed: {e}")),
    }
}

fn entry_list(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print one line per hook
pub fn print_hooks(report: &BatchReport) {
    for hook in &report.hooks {
        println!("{}", format_hook(hook));
    }
}

fn format_hook(hook: &HookReport) -> String {
    let (marker, text) = describe(&hook.outcome);
    let label = hook.label.cyan();
    match hook.outcome {
        HookOutcome::Merged { .. } => format!("{} {label} {}", marker.green(), text.green()),
        HookOutcome::Unchanged => format!("{} {label} {}", marker.dimmed(), text.dimmed()),
        HookOutcome::Skipped(_) => format!("{} {label} {}", marker.yellow(), text.yellow()),
        HookOutcome::Failed(_) => format!("{} {label} {}", marker.red(), text.red()),
    }
}

/// One-line batch summary
pub fn summary(report: &BatchReport) -> String {
    format!(
        "{} merged, {} unchanged, {} skipped, {} failed",
        report.merged(),
        report.unchanged(),
        report.skipped(),
        report.failed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookmerge_engine::SkipReason;

    #[test]
    fn test_describe() {
        let merged = HookOutcome::Merged {
            path: "app.php".into(),
            offset: 10,
            appended: vec![Entry::positional("A"), Entry::keyed("c", "W")],
        };
        assert_eq!(describe(&merged), ("+", "added A, c => W".to_string()));
        assert_eq!(
            describe(&HookOutcome::Skipped(SkipReason::MissingFile)),
            ("-", "skipped: file not found".to_string())
        );
    }

    #[test]
    fn test_summary() {
        let report = BatchReport {
            hooks: vec![HookReport {
                origin: "cli".into(),
                label: "a.php#items".into(),
                outcome: HookOutcome::Unchanged,
            }],
        };
        assert_eq!(summary(&report), "0 merged, 1 unchanged, 0 skipped, 0 failed");
    }
}
