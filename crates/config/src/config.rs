//! Configuration management
//!
//! This module handles loading hookmerge configuration from `hookmerge.toml`.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched in the working directory
pub const CONFIG_FILE_NAME: &str = "hookmerge.toml";

/// General configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory relative hook file paths are resolved against
    #[serde(default, rename = "baseDir")]
    pub base_dir: Option<PathBuf>,

    /// Print diagnostic trace lines for every hook
    #[serde(default)]
    pub verbose: bool,

    /// Also write logs to this file
    #[serde(default, rename = "logFile")]
    pub log_file: Option<PathBuf>,
}

/// Merge configuration section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Indent appended entries like the last existing entry
    #[serde(default = "default_true", rename = "matchIndent")]
    pub match_indent: bool,

    /// Recognise `Name::class` references as anchors
    #[serde(default = "default_true", rename = "classConstants")]
    pub class_constants: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            match_indent: true,
            class_constants: true,
        }
    }
}

/// Main configuration structure
///
/// ```toml
/// [general]
/// baseDir = "."
/// verbose = false
///
/// [merge]
/// matchIndent = true
/// classConstants = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Merge behaviour
    #[serde(default)]
    pub merge: MergeConfig,

    /// Directory of the loaded file, used for relative path resolution
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Relative paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            hookmerge_core::Error::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&content, base_dir).map_err(|e| {
            hookmerge_core::Error::Config(format!("{}: {e}", path.display()))
        })
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_content).map_err(|e| {
            hookmerge_core::Error::Config(format!("Failed to parse config TOML: {e}"))
        })?;

        config.resolve_relative_paths(base_dir);
        Ok(config)
    }

    /// Load `hookmerge.toml` from a directory, or defaults if it has none
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::load(&path)
        } else {
            tracing::debug!(dir = %dir.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve relative paths in configuration
    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        self.config_dir = Some(base_dir.to_path_buf());

        if let Some(ref dir) = self.general.base_dir {
            self.general.base_dir = Some(resolve_path(dir, base_dir));
        }
        if let Some(ref file) = self.general.log_file {
            self.general.log_file = Some(resolve_path(file, base_dir));
        }
    }

    /// Directory hook file paths are resolved against
    ///
    /// Falls back to the configuration file's directory, then to `fallback`.
    #[must_use]
    pub fn base_dir(&self, fallback: &Path) -> PathBuf {
        self.general
            .base_dir
            .clone()
            .or_else(|| self.config_dir.clone())
            .unwrap_or_else(|| fallback.to_path_buf())
    }
}

/// Resolve a single path: expand `~` and resolve relative paths against `base_dir`
#[must_use]
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = ::dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path_str == "~"
        && let Some(home) = ::dirs::home_dir()
    {
        return home;
    }

    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}
