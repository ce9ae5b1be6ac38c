//! Terminal output for hookmerge
//!
//! - Per-hook outcome lines and batch summaries
//! - Dry-run diffs

pub mod preview;
pub mod report;

pub use preview::{ChangeSummary, colorize, unified_diff};
pub use report::{print_hooks, summary};
