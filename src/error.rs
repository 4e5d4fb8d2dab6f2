//! Error types for capcheck operations.
//!
//! This module defines [`CapcheckError`], the primary error type used for
//! everything outside a probe's isolation boundary, and a [`Result`] type
//! alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe failures never surface here; they are converted into
//!   [`ProbeOutcome`](crate::probe::ProbeOutcome)s by the runner
//! - Use `CapcheckError` for manifest and setup errors that need distinct handling
//! - Use `anyhow::Error` (via `CapcheckError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for capcheck operations.
#[derive(Debug, Error)]
pub enum CapcheckError {
    /// Manifest file not found at expected location.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to parse a manifest or environment file.
    #[error("Failed to parse {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// Invalid manifest structure or values.
    #[error("Invalid manifest: {message}")]
    ManifestValidationError { message: String },

    /// A check referenced a value category that does not exist.
    #[error("Unknown value category: {name}")]
    UnknownCategory { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for capcheck operations.
pub type Result<T> = std::result::Result<T, CapcheckError>;
