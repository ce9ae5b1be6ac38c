//! Hook merger
//!
//! Merging is split into independent stages: the structured diff decides
//! what to add, the anchor search decides where, and the splice applies the
//! result as a minimal text patch.

pub mod anchor;
pub mod diff;
pub mod splice;

pub use anchor::{AnchorEncoding, EscapeStyle, InsertionPoint, find_insertion_point};
pub use diff::{compute_append, render_entry};
pub use splice::splice;

use hookmerge_core::{Entry, Value};
use std::fmt;

/// Merge behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Prefix appended lines with the anchor line's indentation
    pub match_indent: bool,
    /// Also look for the anchor as a `Name::class` reference
    pub class_constants: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            match_indent: true,
            class_constants: true,
        }
    }
}

impl MergeOptions {
    /// Anchor encodings enabled by these options, in priority order
    #[must_use]
    pub fn encodings(&self) -> Vec<AnchorEncoding> {
        AnchorEncoding::PRIORITY
            .into_iter()
            .filter(|e| self.class_constants || *e != AnchorEncoding::ClassConstant)
            .collect()
    }
}

/// Why a hook was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The target file does not exist
    MissingFile,
    /// Nothing to anchor on: the key path is missing or the collection is empty
    EmptyCollection,
    /// The key path holds something other than a collection
    NotACollection(&'static str),
    /// The anchor could not be located in the file text
    NoAnchorMatch(String),
    /// The last entry is not a string
    UnsupportedAnchor(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFile => f.write_str("file not found"),
            SkipReason::EmptyCollection => f.write_str("no existing entries to anchor on"),
            SkipReason::NotACollection(found) => write!(f, "key holds a {found}, not an array"),
            SkipReason::NoAnchorMatch(anchor) => write!(f, "anchor '{anchor}' not found in file text"),
            SkipReason::UnsupportedAnchor(found) => {
                write!(f, "last entry is a {found}, not a string")
            }
        }
    }
}

/// Text change for one hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Byte offset of the insertion point in the original text
    pub offset: usize,
    /// Entries inserted, in order
    pub appended: Vec<Entry>,
    /// The new file text
    pub text: String,
}

/// Outcome of planning a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePlan {
    /// Every requested entry is already present
    Unchanged,
    /// Entries to insert
    Insert(Insertion),
}

/// Plan the merge of `requested` into the collection `previous`, found in `source`
///
/// # Errors
///
/// Returns the reason the hook must be skipped; the file must then be left
/// untouched
pub fn plan(
    source: &str,
    previous: &Value,
    requested: &[Entry],
    options: &MergeOptions,
) -> Result<MergePlan, SkipReason> {
    if *previous == Value::Null {
        return Err(SkipReason::EmptyCollection);
    }
    let collection = previous
        .as_collection()
        .ok_or(SkipReason::NotACollection(previous.type_name()))?;

    let Some((_, last)) = collection.last() else {
        return Err(SkipReason::EmptyCollection);
    };

    let appended = compute_append(requested, collection);
    if appended.is_empty() {
        return Ok(MergePlan::Unchanged);
    }

    let anchor = last
        .as_str()
        .ok_or(SkipReason::UnsupportedAnchor(last.type_name()))?;

    let point = find_insertion_point(anchor, source, &options.encodings())
        .ok_or_else(|| SkipReason::NoAnchorMatch(anchor.to_string()))?;

    let rendered: Vec<String> = appended
        .iter()
        .map(|entry| render_entry(entry, point.escape))
        .collect();

    match splice(source, &point, &rendered, options.match_indent) {
        Some(text) => Ok(MergePlan::Insert(Insertion {
            offset: point.offset,
            appended,
            text,
        })),
        None => Ok(MergePlan::Unchanged),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::loader;
    use std::path::Path;

    fn plan_at(source: &str, key: &str, requested: &[Entry]) -> Result<MergePlan, SkipReason> {
        let data = loader::evaluate(Path::new("test.php"), source).unwrap();
        let previous = loader::lookup(&data, key).cloned().unwrap_or(Value::Null);
        plan(source, &previous, requested, &MergeOptions::default())
    }

    fn inserted(plan: Result<MergePlan, SkipReason>) -> Insertion {
        match plan {
            Ok(MergePlan::Insert(insertion)) => insertion,
            other => panic!("expected insertion, got {other:?}"),
        }
    }

    #[test]
    fn test_appends_after_last_entry() {
        let src = "<?php\nreturn [\n    'items' => [\n        'App\\\\Foo',\n        'App\\\\Bar',\n    ],\n];\n";
        let insertion = inserted(plan_at(
            src,
            "items",
            &[Entry::positional("App\\Bar"), Entry::positional("App\\Baz")],
        ));
        assert_eq!(insertion.appended, vec![Entry::positional("App\\Baz")]);
        assert_eq!(
            insertion.text,
            "<?php\nreturn [\n    'items' => [\n        'App\\\\Foo',\n        'App\\\\Bar',\n        'App\\\\Baz',\n    ],\n];\n"
        );
    }

    #[test]
    fn test_all_present_is_unchanged() {
        let src = "<?php return ['items' => ['A',\n]];";
        assert_eq!(
            plan_at(src, "items", &[Entry::positional("A")]),
            Ok(MergePlan::Unchanged)
        );
    }

    #[test]
    fn test_empty_collection_is_skipped() {
        let src = "<?php return ['items' => []];";
        assert_eq!(
            plan_at(src, "items", &[Entry::positional("A")]),
            Err(SkipReason::EmptyCollection)
        );
    }

    #[test]
    fn test_scalar_is_not_a_collection() {
        let src = "<?php return ['items' => 'A'];";
        assert_eq!(
            plan_at(src, "items", &[Entry::positional("A")]),
            Err(SkipReason::NotACollection("string"))
        );
        assert_eq!(
            plan_at(src, "missing", &[Entry::positional("A")]),
            Err(SkipReason::EmptyCollection)
        );
    }

    #[test]
    fn test_non_string_anchor() {
        let src = "<?php return ['items' => [1, 2,\n]];";
        assert_eq!(
            plan_at(src, "items", &[Entry::positional("A")]),
            Err(SkipReason::UnsupportedAnchor("int"))
        );
    }

    #[test]
    fn test_single_line_collection_has_no_anchor() {
        let src = "<?php return ['items' => ['A', 'B']];";
        assert_eq!(
            plan_at(src, "items", &[Entry::positional("C")]),
            Err(SkipReason::NoAnchorMatch("B".into()))
        );
    }

    #[test]
    fn test_class_constant_collection() {
        let src = "<?php\nreturn [\n    'providers' => [\n        App\\Providers\\AppServiceProvider::class,\n    ],\n];\n";
        let insertion = inserted(plan_at(
            src,
            "providers",
            &[Entry::positional("App\\Providers\\EventServiceProvider")],
        ));
        assert!(insertion.text.contains(
            "        App\\Providers\\AppServiceProvider::class,\n        'App\\Providers\\EventServiceProvider',\n    ],"
        ));
    }

    #[test]
    fn test_class_constants_can_be_disabled() {
        let src = "<?php\nreturn [\n    'providers' => [\n        App\\Foo::class,\n    ],\n];\n";
        let data = loader::evaluate(Path::new("t.php"), src).unwrap();
        let previous = loader::lookup(&data, "providers").unwrap();
        let options = MergeOptions {
            class_constants: false,
            ..MergeOptions::default()
        };
        assert_eq!(
            plan(src, previous, &[Entry::positional("App\\Bar")], &options),
            Err(SkipReason::NoAnchorMatch("App\\Foo".into()))
        );
    }

    #[test]
    fn test_reapplying_is_unchanged() {
        let src = "<?php\nreturn [\n    'h' => [\n        'a' => 'X',\n    ],\n];\n";
        let requested = [Entry::keyed("c", "W")];
        let first = inserted(plan_at(src, "h", &requested));
        assert_eq!(plan_at(&first.text, "h", &requested), Ok(MergePlan::Unchanged));
    }
}
