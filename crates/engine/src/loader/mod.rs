//! Structure loader
//!
//! Target files are data-defining scripts whose single top-level `return`
//! produces nested arrays. The loader evaluates that return value without
//! executing anything: literals and arrays are decoded, other expressions are
//! kept as opaque source text.

pub mod lexer;
pub mod parser;

use crate::system::System;
use hookmerge_core::{Error, Result, Value};
use std::path::Path;

/// A syntax error at a byte offset in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset of the offending token
    pub offset: usize,
    /// What went wrong
    pub message: String,
}

impl SyntaxError {
    /// Create a syntax error
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    /// Convert into a core error, resolving the offset to a 1-based line and column
    #[must_use]
    pub fn into_error(self, path: &Path, source: &str) -> Error {
        let (line, column) = line_column(source, self.offset);
        Error::Parse {
            path: path.to_path_buf(),
            line,
            column,
            message: self.message,
        }
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let before = &source[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Evaluate the return value of a script
///
/// # Errors
///
/// Returns [`Error::Parse`] if the source cannot be tokenized or has no
/// well-formed top-level `return`
pub fn evaluate(path: &Path, source: &str) -> Result<Value> {
    lexer::tokenize(source)
        .and_then(|tokens| parser::evaluate(source, &tokens))
        .map_err(|e| e.into_error(path, source))
}

/// A target file and its decoded data
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Raw text as read
    pub source: String,
    /// Decoded return value
    pub data: Value,
}

impl LoadedFile {
    /// Resolve a dotted key path in the decoded data
    #[must_use]
    pub fn lookup(&self, key_path: &str) -> Option<&Value> {
        lookup(&self.data, key_path)
    }
}

/// Resolve a dotted key path against a decoded value
///
/// Returns `None` when the root is not an array or the path is missing.
#[must_use]
pub fn lookup<'a>(root: &'a Value, key_path: &str) -> Option<&'a Value> {
    root.as_collection()?.lookup(key_path)
}

/// Loads target files through a [`System`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureLoader<S> {
    system: S,
}

impl<S: System> StructureLoader<S> {
    /// Create a loader over the given system
    pub fn new(system: S) -> Self {
        Self { system }
    }

    /// Read and evaluate a file
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or evaluated
    pub fn open(&self, path: &Path) -> Result<Option<LoadedFile>> {
        if !self.system.exists(path) {
            return Ok(None);
        }

        let source = self.system.read_to_string(path)?;
        let data = evaluate(path, &source)?;
        Ok(Some(LoadedFile { source, data }))
    }

    /// Load the value at `key_path` in a file
    ///
    /// Returns `Ok(None)` if the file does not exist or the path is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or evaluated
    pub fn load(&self, path: &Path, key_path: &str) -> Result<Option<Value>> {
        Ok(self
            .open(path)?
            .and_then(|file| file.lookup(key_path).cloned()))
    }
}
