//! Configuration management for hookmerge
//!
//! This crate handles:
//! - Configuration loading (`hookmerge.toml`)
//! - Package manifest discovery
//! - Logging initialization

pub mod config;
pub mod logging;
pub mod manifest;

// Re-export error types from core
pub use hookmerge_core::{Error, Result};

// Re-export main types
pub use config::{CONFIG_FILE_NAME, Config, GeneralConfig, MergeConfig, resolve_path};
pub use manifest::{discover, read_manifest};
