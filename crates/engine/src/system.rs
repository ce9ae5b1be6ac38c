//! System abstraction for filesystem operations
//!
//! Hooks only need to test for, read and rewrite target files. Routing those
//! calls through a trait lets the runner work against the real filesystem or
//! against an in-memory overlay for dry runs.

use hookmerge_core::{Error, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations
///
/// Implementations:
/// - `RealSystem`: Actual filesystem operations
/// - `DryRunSystem`: Reads from disk, keeps writes in memory
pub trait System {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a file's contents as UTF-8
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a file's contents
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

impl<T: System + ?Sized> System for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        (**self).write(path, contents)
    }
}

/// Real filesystem implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSystem;

impl System for RealSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// A write that a dry run would have performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    /// Target file
    pub path: PathBuf,
    /// Contents before the first planned write
    pub original: String,
    /// Contents after the last planned write
    pub contents: String,
}

/// Dry-run system that reads from disk and keeps writes in memory
///
/// Later reads of a written path see the planned contents, so several hooks
/// targeting the same file compose exactly as they would for real.
#[derive(Debug, Default)]
pub struct DryRunSystem {
    writes: RefCell<IndexMap<PathBuf, PlannedWrite>>,
}

impl DryRunSystem {
    /// Create a new dry-run system
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files that would be written, in first-write order
    #[must_use]
    pub fn planned_writes(&self) -> Vec<PlannedWrite> {
        self.writes.borrow().values().cloned().collect()
    }
}

impl System for DryRunSystem {
    fn exists(&self, path: &Path) -> bool {
        self.writes.borrow().contains_key(path) || RealSystem.exists(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        if let Some(planned) = self.writes.borrow().get(path) {
            return Ok(planned.contents.clone());
        }
        RealSystem.read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let mut writes = self.writes.borrow_mut();
        if let Some(planned) = writes.get_mut(path) {
            planned.contents = contents.to_string();
            return Ok(());
        }

        let original = RealSystem.read_to_string(path).unwrap_or_default();
        writes.insert(
            path.to_path_buf(),
            PlannedWrite {
                path: path.to_path_buf(),
                original,
                contents: contents.to_string(),
            },
        );
        Ok(())
    }
}
