//! Core types and utilities for hookmerge
//!
//! This is the foundation crate (Layer 0) that all other hookmerge crates depend on.
//! It provides:
//! - Base error types
//! - The decoded value model produced by the structure loader ([`Value`], [`Collection`])
//! - Hook and entry types ([`Hook`], [`Entry`], [`HookDescriptor`])
//! - The diagnostic channel trait ([`Diagnostics`])
//!
//! This crate has no dependencies on other hookmerge crates.

pub mod error;
pub mod hook;
pub mod traits;
pub mod value;

pub use error::{Error, Result};
pub use hook::{Classes, Entry, Hook, HookDescriptor, HookSource};
pub use traits::{Diagnostics, NoOpDiagnostics};
pub use value::{ArrayKey, Collection, Value};
