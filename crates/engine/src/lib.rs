//! # Hookmerge Engine
//!
//! Source-level merging of hook entries into data-defining scripts.
//!
//! - **Loader**: Evaluates a file's top-level `return` array without executing it
//! - **Merge**: Computes missing entries, locates the insertion point and splices them in
//! - **System Abstraction**: Filesystem operations abstracted for testing and dry runs
//! - **Runner**: Processes batches of hooks with per-hook failure isolation

pub mod loader;
pub mod merge;
pub mod runner;
pub mod system;

// Re-export error types from core
pub use hookmerge_core::{Error, Result};

// Re-export commonly used types
pub use loader::{LoadedFile, StructureLoader};
pub use merge::{MergeOptions, MergePlan, SkipReason};
pub use runner::{BatchReport, HookOutcome, HookReport, HookRunner, HookRunnerBuilder, TracingDiagnostics};
pub use system::{DryRunSystem, PlannedWrite, RealSystem, System};
