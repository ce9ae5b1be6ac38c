//! End-to-end merge scenarios against real files

#![allow(clippy::unwrap_used, clippy::panic)]

use hookmerge_core::{Entry, Hook, HookSource};
use hookmerge_engine::loader::StructureLoader;
use hookmerge_engine::{HookOutcome, HookRunner, RealSystem, SkipReason};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(temp: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn digest(path: &Path) -> Vec<u8> {
    Sha256::digest(fs::read(path).unwrap()).to_vec()
}

fn strings(path: &Path, key: &str) -> Vec<String> {
    let value = StructureLoader::new(RealSystem)
        .load(path, key)
        .unwrap()
        .unwrap();
    value
        .as_collection()
        .unwrap()
        .values()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn positional(values: &[&str]) -> Vec<Entry> {
    values.iter().map(|v| Entry::positional(*v)).collect()
}

#[test]
fn test_appends_only_missing_entry_after_last_line() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "app.php",
        "<?php\nreturn [\n'items' => ['App\\\\Foo', 'App\\\\Bar',\n]\n];\n",
    );

    let outcome = HookRunner::new().run_hook(&Hook::new(
        "items",
        &path,
        positional(&["App\\Bar", "App\\Baz"]),
    ));
    assert!(matches!(outcome, HookOutcome::Merged { ref appended, .. } if appended.len() == 1));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?php\nreturn [\n'items' => ['App\\\\Foo', 'App\\\\Bar',\n'App\\\\Baz',\n]\n];\n"
    );
    assert_eq!(
        strings(&path, "items"),
        vec!["App\\Foo", "App\\Bar", "App\\Baz"]
    );
}

#[test]
fn test_keyed_entries_never_overwrite() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "handlers.php",
        "<?php\nreturn [\n    'handlers' => [\n        'a' => 'X',\n        'b' => 'Y',\n    ],\n];\n",
    );

    let outcome = HookRunner::new().run_hook(&Hook::new(
        "handlers",
        &path,
        vec![Entry::keyed("b", "Z"), Entry::keyed("c", "W")],
    ));
    assert!(matches!(outcome, HookOutcome::Merged { .. }));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("        'b' => 'Y',\n        'c' => 'W',\n    ],"));
    assert!(!text.contains("'Z'"));
}

#[test]
fn test_missing_file_is_noop() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.php");
    let other = write(&temp, "app.php", "<?php return ['items' => [\n    'A',\n]];\n");

    let report = HookRunner::new().run(vec![
        HookSource::new("pkg", Hook::new("items", &missing, positional(&["X"]))),
        HookSource::new("pkg", Hook::new("items", &other, positional(&["B"]))),
    ]);

    assert!(matches!(
        report.hooks[0].outcome,
        HookOutcome::Skipped(SkipReason::MissingFile)
    ));
    assert!(!missing.exists());
    assert_eq!(strings(&other, "items"), vec!["A", "B"]);
    assert!(!report.has_failures());
}

#[test]
fn test_sequential_hooks_on_one_file() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "app.php",
        "<?php\n\nreturn [\n    'providers' => [\n        App\\Providers\\AppServiceProvider::class,\n    ],\n\n    'aliases' => [\n        'Cache' => 'Illuminate\\Support\\Facades\\Cache',\n    ],\n];\n",
    );

    let report = HookRunner::new().run(vec![
        HookSource::new(
            "first",
            Hook::new("providers", &path, positional(&["Vendor\\First\\Provider"])),
        ),
        HookSource::new(
            "second",
            Hook::new("providers", &path, positional(&["Vendor\\Second\\Provider"])),
        ),
        HookSource::new(
            "third",
            Hook::new(
                "aliases",
                &path,
                vec![Entry::keyed("Queue", "Illuminate\\Support\\Facades\\Queue")],
            ),
        ),
    ]);
    assert_eq!(report.merged(), 3);

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?php\n\nreturn [\n    'providers' => [\n        App\\Providers\\AppServiceProvider::class,\n        'Vendor\\First\\Provider',\n        'Vendor\\Second\\Provider',\n    ],\n\n    'aliases' => [\n        'Cache' => 'Illuminate\\Support\\Facades\\Cache',\n        'Queue' => 'Illuminate\\Support\\Facades\\Queue',\n    ],\n];\n"
    );
}

#[test]
fn test_reapplying_leaves_file_identical() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "app.php",
        "<?php\n// 'App\\\\Foo',\nreturn [\n    'app' => [\n        'providers' => [\n            \"App\\\\Foo\",\n        ],\n    ],\n];\n",
    );
    let hook = Hook::new("app.providers", &path, positional(&["App\\Bar", "App\\Baz"]));
    let runner = HookRunner::new();

    assert!(matches!(runner.run_hook(&hook), HookOutcome::Merged { .. }));
    let after_first = digest(&path);

    assert!(matches!(runner.run_hook(&hook), HookOutcome::Unchanged));
    assert_eq!(digest(&path), after_first);
    assert_eq!(
        strings(&path, "app.providers"),
        vec!["App\\Foo", "App\\Bar", "App\\Baz"]
    );
}

#[test]
fn test_merge_is_superset_of_previous() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "list.php",
        "<?php\nreturn [\n    'list' => [\n        'one',\n        'two',\n        'three'\n    ],\n    'other' => env('X', 'y'),\n];\n",
    );
    let before = strings(&path, "list");

    HookRunner::new().run_hook(&Hook::new(
        "list",
        &path,
        positional(&["two", "four", "five", "four"]),
    ));

    let after = strings(&path, "list");
    assert_eq!(after[..before.len()], before[..]);
    assert_eq!(after[before.len()..], ["four", "five"]);
    assert!(fs::read_to_string(&path).unwrap().contains("'three',\n        'four',"));
}

#[test]
fn test_empty_collection_is_noop() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "app.php", "<?php\nreturn [\n    'items' => [],\n];\n");
    let before = digest(&path);

    let outcome = HookRunner::new().run_hook(&Hook::new("items", &path, positional(&["A"])));
    assert!(matches!(
        outcome,
        HookOutcome::Skipped(SkipReason::EmptyCollection)
    ));
    assert_eq!(digest(&path), before);
}

#[test]
fn test_unmatched_anchor_is_noop() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "app.php", "<?php return ['items' => ['A', 'B']];");
    let before = digest(&path);

    let outcome = HookRunner::new().run_hook(&Hook::new("items", &path, positional(&["C"])));
    assert!(matches!(
        outcome,
        HookOutcome::Skipped(SkipReason::NoAnchorMatch(_))
    ));
    assert_eq!(digest(&path), before);
}

#[test]
fn test_unrelated_closures_and_heredocs_do_not_block_merge() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "app.php",
        "<?php\nreturn [\n    'resolver' => fn () => null,\n    'banner' => <<<EOT\n      Don't panic\n      EOT,\n    'providers' => [\n        'App\\\\Foo',\n    ],\n];\n",
    );

    let outcome =
        HookRunner::new().run_hook(&Hook::new("providers", &path, positional(&["App\\Bar"])));
    assert!(matches!(outcome, HookOutcome::Merged { .. }), "{outcome:?}");
    assert_eq!(strings(&path, "providers"), vec!["App\\Foo", "App\\Bar"]);
}

#[test]
fn test_anchor_with_escaped_quote() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "phrases.php",
        "<?php\nreturn [\n    'phrases' => [\n        'it\\'s',\n    ],\n];\n",
    );

    let outcome =
        HookRunner::new().run_hook(&Hook::new("phrases", &path, positional(&["don't"])));
    assert!(matches!(outcome, HookOutcome::Merged { .. }), "{outcome:?}");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?php\nreturn [\n    'phrases' => [\n        'it\\'s',\n        'don\\'t',\n    ],\n];\n"
    );
    assert_eq!(strings(&path, "phrases"), vec!["it's", "don't"]);
}
