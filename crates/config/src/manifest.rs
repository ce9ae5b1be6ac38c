//! Package manifest discovery
//!
//! Packages declare hooks in their JSON manifest:
//!
//! ```json
//! {
//!     "name": "vendor/package",
//!     "extra": {
//!         "hooks": [
//!             { "key": "providers", "classes": ["Vendor\\Provider"], "file": "config/app.php" }
//!         ]
//!     }
//! }
//! ```
//!
//! A lock file listing several packages under `packages` is read package by
//! package, in order.

use crate::Result;
use hookmerge_core::{Error, Hook, HookDescriptor, HookSource};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    extra: Option<serde_json::Value>,
    #[serde(default)]
    packages: Option<Vec<PackageManifest>>,
}

/// Read the hooks declared in one manifest, in declaration order
///
/// Each hook element is decoded on its own; a malformed element becomes a
/// failed [`HookSource`] instead of failing the manifest.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, is not valid JSON, or
/// `extra.hooks` is not an array
pub fn read_manifest(path: &Path) -> Result<Vec<HookSource>> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let manifest: PackageManifest = serde_json::from_str(&content).map_err(|e| Error::Manifest {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let fallback = path.display().to_string();
    let mut sources = Vec::new();
    collect(path, &manifest, &fallback, &mut sources)?;

    tracing::debug!(path = %path.display(), count = sources.len(), "Read manifest");
    Ok(sources)
}

/// Read several manifests, keeping the order they are given in
///
/// # Errors
///
/// Returns the first manifest-level error
pub fn discover(paths: &[PathBuf]) -> Result<Vec<HookSource>> {
    let mut sources = Vec::new();
    for path in paths {
        sources.extend(read_manifest(path)?);
    }
    Ok(sources)
}

fn collect(
    path: &Path,
    manifest: &PackageManifest,
    fallback: &str,
    sources: &mut Vec<HookSource>,
) -> Result<()> {
    let package = manifest.name.as_deref().unwrap_or(fallback);

    if let Some(hooks) = manifest.extra.as_ref().and_then(|extra| extra.get("hooks")) {
        let elements = hooks.as_array().ok_or_else(|| Error::Manifest {
            path: path.to_path_buf(),
            message: format!("{package}: extra.hooks must be an array"),
        })?;

        for (index, element) in elements.iter().enumerate() {
            sources.push(decode_hook(package, index, element));
        }
    }

    for nested in manifest.packages.iter().flatten() {
        collect(path, nested, fallback, sources)?;
    }

    Ok(())
}

fn decode_hook(package: &str, index: usize, element: &serde_json::Value) -> HookSource {
    match HookDescriptor::deserialize(element) {
        Ok(descriptor) => HookSource::new(package, Hook::from(descriptor)),
        Err(e) => {
            tracing::warn!(package, index, error = %e, "Malformed hook descriptor");
            HookSource::failed(
                package,
                Error::HookConfig(format!("{package}: hook #{index}: {e}")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use hookmerge_core::Entry;
    use tempfile::TempDir;

    fn manifest(temp: &TempDir, json: &str) -> PathBuf {
        let path = temp.path().join("composer.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_no_extra_means_no_hooks() {
        let temp = TempDir::new().unwrap();
        let path = manifest(&temp, r#"{"name": "vendor/pkg"}"#);
        assert!(read_manifest(&path).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_element_is_isolated() {
        let temp = TempDir::new().unwrap();
        let path = manifest(
            &temp,
            r#"{"name": "vendor/pkg", "extra": {"hooks": [
                {"key": "items", "file": "a.php"},
                {"key": "items", "classes": ["A"], "file": "a.php"}
            ]}}"#,
        );

        let sources = read_manifest(&path).unwrap();
        assert_eq!(sources.len(), 2);

        let err = sources[0].hook.as_ref().unwrap_err();
        assert!(matches!(err, Error::HookConfig(_)));
        assert!(err.to_string().contains("vendor/pkg: hook #0"));

        let hook = sources[1].hook.as_ref().unwrap();
        assert_eq!(hook.entries, vec![Entry::positional("A")]);
        assert_eq!(sources[1].origin, "vendor/pkg");
    }

    #[test]
    fn test_hooks_not_an_array() {
        let temp = TempDir::new().unwrap();
        let path = manifest(&temp, r#"{"extra": {"hooks": {"key": "x"}}}"#);
        assert!(matches!(
            read_manifest(&path).unwrap_err(),
            Error::Manifest { .. }
        ));
    }

    #[test]
    fn test_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = manifest(&temp, "{ not json");
        assert!(matches!(
            read_manifest(&path).unwrap_err(),
            Error::Manifest { .. }
        ));
    }

    #[test]
    fn test_missing_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            read_manifest(&temp.path().join("composer.json")).unwrap_err(),
            Error::FileRead { .. }
        ));
    }

    #[test]
    fn test_unnamed_manifest_uses_path_as_origin() {
        let temp = TempDir::new().unwrap();
        let path = manifest(
            &temp,
            r#"{"extra": {"hooks": [{"key": "k", "classes": ["A"], "file": "f.php"}]}}"#,
        );
        let sources = read_manifest(&path).unwrap();
        assert_eq!(sources[0].origin, path.display().to_string());
    }
}
