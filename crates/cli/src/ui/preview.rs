//! Change preview for dry runs

use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};

/// Lines added and removed between two texts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Lines only in the new text
    pub lines_added: usize,
    /// Lines only in the old text
    pub lines_removed: usize,
}

impl ChangeSummary {
    /// Create summary from two text contents
    pub fn from_texts(old: &str, new: &str) -> Self {
        let diff = TextDiff::from_lines(old, new);
        let mut summary = Self {
            lines_added: 0,
            lines_removed: 0,
        };

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => summary.lines_added += 1,
                ChangeTag::Delete => summary.lines_removed += 1,
                ChangeTag::Equal => {}
            }
        }

        summary
    }
}

/// Unified diff between two versions of `name`, without colors
pub fn unified_diff(name: &str, old: &str, new: &str, context_lines: usize) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(context_lines)
        .header(&format!("a/{name}"), &format!("b/{name}"))
        .to_string()
}

/// Colorize a unified diff for the terminal
pub fn colorize(diff: &str) -> String {
    diff.lines()
        .map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                line.bold().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else if line.starts_with("@@") {
                line.cyan().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
