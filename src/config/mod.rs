//! Manifest loading, parsing, and validation for capcheck.
//!
//! This module handles the CLI's input:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use capcheck::config::LoadedManifest;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("capcheck.yml");
//! fs::write(&path, "environment: {fs: {read: 1}}\nprobes:\n  - name: fs.read\n").unwrap();
//!
//! let loaded = LoadedManifest::load(&path).unwrap();
//! assert!(loaded.environment.contains("fs.read"));
//! assert_eq!(loaded.registry.len(), 1);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{CheckConfig, CheckKind, Manifest, ProbeConfig};

// Loader re-exports
pub use loader::{find_manifest, load_manifest, parse_manifest, LoadedManifest, MANIFEST_FILE_NAMES};

// Validator re-exports
pub use validator::{validate, validate_manifest, Severity, ValidationError};
