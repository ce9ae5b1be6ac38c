//! Core behavioral traits for hookmerge components
//!
//! The diagnostic channel is an external sink for human-readable trace lines
//! (hook received, file not found, computed offset, append list). It is handed
//! to the runner at construction time and never affects control flow.

/// Diagnostic sink
///
/// # Examples
///
/// ```ignore
/// let lines = std::cell::RefCell::new(Vec::new());
/// let sink = |line: &str| lines.borrow_mut().push(line.to_string());
/// let runner = HookRunner::builder().diagnostics(sink).build();
/// ```
pub trait Diagnostics {
    /// Record one trace line
    fn trace(&self, line: &str);
}

/// Diagnostic sink that discards everything (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDiagnostics;

impl Diagnostics for NoOpDiagnostics {
    fn trace(&self, _line: &str) {}
}

/// Implement Diagnostics for closures
impl<F> Diagnostics for F
where
    F: Fn(&str),
{
    fn trace(&self, line: &str) {
        self(line);
    }
}
