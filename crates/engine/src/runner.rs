//! Batch hook runner
//!
//! Hooks run strictly in the order given, each to completion before the next
//! starts, so hooks targeting the same file observe each other's writes. A
//! failing hook is recorded in the report and never stops the batch.

use crate::loader::StructureLoader;
use crate::merge::{self, MergeOptions, MergePlan, SkipReason};
use crate::system::{RealSystem, System};
use hookmerge_core::{Diagnostics, Entry, Error, Hook, HookSource, NoOpDiagnostics, Result};
use std::path::{Path, PathBuf};

/// Diagnostic sink forwarding trace lines to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn trace(&self, line: &str) {
        tracing::info!("{line}");
    }
}

/// What happened to one hook
#[derive(Debug)]
pub enum HookOutcome {
    /// Entries were inserted and the file rewritten
    Merged {
        /// File that was written
        path: PathBuf,
        /// Byte offset of the insertion point
        offset: usize,
        /// Entries inserted, in order
        appended: Vec<Entry>,
    },
    /// Every requested entry was already present
    Unchanged,
    /// Left alone without touching the file
    Skipped(SkipReason),
    /// Failed; the file was not written
    Failed(Error),
}

impl HookOutcome {
    /// Whether the hook failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, HookOutcome::Failed(_))
    }
}

/// Outcome of one hook with its identity
#[derive(Debug)]
pub struct HookReport {
    /// Where the hook was declared
    pub origin: String,
    /// `file#key.path`, or the origin when the descriptor was malformed
    pub label: String,
    /// What happened
    pub outcome: HookOutcome,
}

/// Outcomes of a batch, in batch order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per hook source
    pub hooks: Vec<HookReport>,
}

impl BatchReport {
    /// Number of hooks that rewrote their file
    #[must_use]
    pub fn merged(&self) -> usize {
        self.count(|o| matches!(o, HookOutcome::Merged { .. }))
    }

    /// Number of hooks that failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(HookOutcome::is_failure)
    }

    /// Number of skipped hooks
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, HookOutcome::Skipped(_)))
    }

    /// Number of hooks with nothing to add
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, HookOutcome::Unchanged))
    }

    /// Whether any hook failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.hooks.iter().any(|r| r.outcome.is_failure())
    }

    fn count(&self, pred: impl Fn(&HookOutcome) -> bool) -> usize {
        self.hooks.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Hook runner
///
/// # Examples
///
/// ```ignore
/// let runner = HookRunner::builder()
///     .base_dir(project_root)
///     .diagnostics(TracingDiagnostics)
///     .build();
///
/// let report = runner.run(sources);
/// ```
pub struct HookRunner<S = RealSystem, D = NoOpDiagnostics>
where
    S: System,
    D: Diagnostics,
{
    loader: StructureLoader<S>,
    system: S,
    diagnostics: D,
    base_dir: PathBuf,
    options: MergeOptions,
}

impl HookRunner<RealSystem, NoOpDiagnostics> {
    /// Create a runner on the real filesystem, resolving paths against the
    /// current directory
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for a runner
    #[must_use]
    pub fn builder() -> HookRunnerBuilder<RealSystem, NoOpDiagnostics> {
        HookRunnerBuilder::new()
    }
}

impl Default for HookRunner<RealSystem, NoOpDiagnostics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, D> HookRunner<S, D>
where
    S: System + Clone,
    D: Diagnostics,
{
    /// Run a batch of hooks in order
    #[tracing::instrument(skip_all)]
    pub fn run(&self, sources: impl IntoIterator<Item = HookSource>) -> BatchReport {
        let mut report = BatchReport::default();

        for source in sources {
            let (label, outcome) = match source.hook {
                Ok(hook) => (hook.label(), self.run_hook(&hook)),
                Err(e) => {
                    self.diagnostics
                        .trace(&format!("Invalid hook from {}: {e}", source.origin));
                    tracing::warn!(origin = %source.origin, error = %e, "Invalid hook descriptor");
                    (source.origin.clone(), HookOutcome::Failed(e))
                }
            };

            report.hooks.push(HookReport {
                origin: source.origin,
                label,
                outcome,
            });
        }

        tracing::debug!(
            merged = report.merged(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }

    /// Run a single hook
    #[tracing::instrument(skip(self, hook), fields(hook = %hook.label()))]
    pub fn run_hook(&self, hook: &Hook) -> HookOutcome {
        self.diagnostics.trace(&format!(
            "Hook received: key={} file={} entries=[{}]",
            hook.key_path,
            hook.file.display(),
            join_entries(&hook.entries)
        ));

        match self.merge_hook(hook) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.diagnostics.trace(&format!("Hook failed: {e}"));
                tracing::warn!(error = %e, "Hook failed");
                HookOutcome::Failed(e)
            }
        }
    }

    fn merge_hook(&self, hook: &Hook) -> Result<HookOutcome> {
        hook.validate()?;

        let path = self.resolve(&hook.file);
        let Some(file) = self.loader.open(&path)? else {
            self.diagnostics
                .trace(&format!("File not found: {}", path.display()));
            tracing::debug!(path = %path.display(), "Target file not found");
            return Ok(HookOutcome::Skipped(SkipReason::MissingFile));
        };

        let Some(previous) = file.lookup(&hook.key_path) else {
            tracing::debug!(key = %hook.key_path, "Key path not found");
            return Ok(HookOutcome::Skipped(SkipReason::EmptyCollection));
        };

        let insertion = match merge::plan(&file.source, previous, &hook.entries, &self.options) {
            Ok(MergePlan::Insert(insertion)) => insertion,
            Ok(MergePlan::Unchanged) => {
                self.diagnostics.trace("Append: []");
                tracing::debug!("All entries already present");
                return Ok(HookOutcome::Unchanged);
            }
            Err(reason) => {
                self.diagnostics.trace(&format!("Skipped: {reason}"));
                tracing::debug!(%reason, "Hook skipped");
                return Ok(HookOutcome::Skipped(reason));
            }
        };

        self.diagnostics
            .trace(&format!("Offset: {}", insertion.offset));
        self.diagnostics
            .trace(&format!("Append: [{}]", join_entries(&insertion.appended)));

        self.system.write(&path, &insertion.text)?;
        tracing::debug!(
            path = %path.display(),
            offset = insertion.offset,
            count = insertion.appended.len(),
            "Entries inserted"
        );

        Ok(HookOutcome::Merged {
            path,
            offset: insertion.offset,
            appended: insertion.appended,
        })
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.base_dir.join(file)
        }
    }
}

fn join_entries(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builder for [`HookRunner`]
pub struct HookRunnerBuilder<S = RealSystem, D = NoOpDiagnostics>
where
    S: System,
    D: Diagnostics,
{
    system: S,
    diagnostics: D,
    base_dir: PathBuf,
    options: MergeOptions,
}

impl HookRunnerBuilder<RealSystem, NoOpDiagnostics> {
    /// Create a builder with the real filesystem and no diagnostics
    ///
    /// This is typically called via [`HookRunner::builder`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: RealSystem,
            diagnostics: NoOpDiagnostics,
            base_dir: PathBuf::new(),
            options: MergeOptions::default(),
        }
    }
}

impl Default for HookRunnerBuilder<RealSystem, NoOpDiagnostics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, D> HookRunnerBuilder<S, D>
where
    S: System,
    D: Diagnostics,
{
    /// Use a different filesystem backend
    ///
    /// Transforms the builder to use a specific system type.
    pub fn system<T>(self, system: T) -> HookRunnerBuilder<T, D>
    where
        T: System,
    {
        HookRunnerBuilder {
            system,
            diagnostics: self.diagnostics,
            base_dir: self.base_dir,
            options: self.options,
        }
    }

    /// Set the diagnostic sink
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let runner = HookRunner::builder()
    ///     .diagnostics(|line: &str| eprintln!("{line}"))
    ///     .build();
    /// ```
    pub fn diagnostics<T>(self, diagnostics: T) -> HookRunnerBuilder<S, T>
    where
        T: Diagnostics,
    {
        HookRunnerBuilder {
            system: self.system,
            diagnostics,
            base_dir: self.base_dir,
            options: self.options,
        }
    }

    /// Directory relative hook paths are resolved against
    #[must_use]
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Merge behaviour switches
    #[must_use]
    pub fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the runner
    pub fn build(self) -> HookRunner<S, D>
    where
        S: Clone,
    {
        HookRunner {
            loader: StructureLoader::new(self.system.clone()),
            system: self.system,
            diagnostics: self.diagnostics,
            base_dir: self.base_dir,
            options: self.options,
        }
    }
}
