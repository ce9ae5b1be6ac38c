//! Hook definitions
//!
//! A hook asks for a set of entries to exist in the collection found at a
//! dotted key path inside a target file.

use crate::value::ArrayKey;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// An entry to guarantee present in a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// Identified by value
    Positional(String),
    /// Identified by key; the value is only written when the key is absent
    Keyed {
        /// Array key
        key: String,
        /// Value stored under the key
        value: String,
    },
}

impl Entry {
    /// Create a positional entry
    pub fn positional(value: impl Into<String>) -> Self {
        Entry::Positional(value.into())
    }

    /// Create a keyed entry
    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Entry::Keyed {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a command-line entry: `name=VALUE` is keyed, anything else positional
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => Entry::keyed(key, value),
            _ => Entry::positional(arg),
        }
    }

    /// The key, for keyed entries
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Entry::Positional(_) => None,
            Entry::Keyed { key, .. } => Some(key),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Positional(value) => f.write_str(value),
            Entry::Keyed { key, value } => write!(f, "{key} => {value}"),
        }
    }
}

/// A single hook: ensure `entries` exist at `key_path` in `file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hook {
    /// Dot-separated key path into the file's decoded data
    pub key_path: String,

    /// Target file
    pub file: PathBuf,

    /// Entries to guarantee present, in request order
    pub entries: Vec<Entry>,
}

impl Hook {
    /// Create a new hook
    pub fn new(key_path: impl Into<String>, file: impl Into<PathBuf>, entries: Vec<Entry>) -> Self {
        Self {
            key_path: key_path.into(),
            file: file.into(),
            entries,
        }
    }

    /// Validate the hook
    ///
    /// # Errors
    ///
    /// Returns an error if the key path or file is empty
    pub fn validate(&self) -> Result<()> {
        if self.key_path.trim().is_empty() {
            return Err(Error::HookConfig(format!(
                "Hook for '{}' has an empty key",
                self.file.display()
            )));
        }

        if self.file.as_os_str().is_empty() {
            return Err(Error::HookConfig(format!(
                "Hook for key '{}' has an empty file",
                self.key_path
            )));
        }

        Ok(())
    }

    /// Human-readable identifier for logs: `file#key.path`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}#{}", self.file.display(), self.key_path)
    }
}

/// Hook descriptor as declared in package metadata
///
/// ```json
/// { "key": "app.providers", "classes": ["App\\FooProvider"], "file": "config/app.php" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDescriptor {
    /// Dotted key path
    pub key: String,

    /// Entries, either a list or a name → value map
    pub classes: Classes,

    /// Target file
    pub file: PathBuf,
}

/// Declared entries of a hook descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Classes {
    /// Positional entries
    List(Vec<String>),
    /// Keyed entries, in declaration order
    Map(IndexMap<String, String>),
}

impl Classes {
    /// Convert to entries
    ///
    /// Map keys that are canonical integers address positions, so they
    /// produce positional entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Classes::List(values) => values.into_iter().map(Entry::Positional).collect(),
            Classes::Map(map) => map
                .into_iter()
                .map(|(key, value)| match ArrayKey::from_string(&key) {
                    ArrayKey::Int(_) => Entry::Positional(value),
                    ArrayKey::Str(key) => Entry::Keyed { key, value },
                })
                .collect(),
        }
    }
}

impl From<HookDescriptor> for Hook {
    fn from(descriptor: HookDescriptor) -> Self {
        Hook::new(
            descriptor.key,
            descriptor.file,
            descriptor.classes.into_entries(),
        )
    }
}

/// A hook together with where it was declared
///
/// Descriptors that failed to decode still travel as sources so the batch
/// can report them in position.
#[derive(Debug)]
pub struct HookSource {
    /// Where the hook was declared (package name, manifest path, `cli`)
    pub origin: String,
    /// The decoded hook, or why decoding failed
    pub hook: Result<Hook>,
}

impl HookSource {
    /// A successfully decoded hook
    pub fn new(origin: impl Into<String>, hook: Hook) -> Self {
        Self {
            origin: origin.into(),
            hook: Ok(hook),
        }
    }

    /// A descriptor that could not be decoded
    pub fn failed(origin: impl Into<String>, error: Error) -> Self {
        Self {
            origin: origin.into(),
            hook: Err(error),
        }
    }
}
