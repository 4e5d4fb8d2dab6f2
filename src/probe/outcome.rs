//! Probe outcomes and probe-level errors.
//!
//! Each probe produces exactly one [`ProbeRecord`]: its [`ProbeOutcome`]
//! plus the aliases that failed to resolve.

use serde::Serialize;
use thiserror::Error;

/// Errors raised inside a probe's isolation boundary.
///
/// None of these escape the probe; the runner turns them into outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The capability under test did not resolve.
    #[error("capability absent")]
    CapabilityAbsent,

    /// A check inside the probe did not hold.
    #[error("assertion failed: {message}")]
    AssertionFailed { message: String },

    /// Anything else that went wrong while the probe ran, including panics.
    #[error("{message}")]
    Runtime { message: String },

    /// One or more declared aliases did not resolve.
    #[error("undefined aliases: {}", aliases.join(", "))]
    AliasMissing { aliases: Vec<String> },
}

impl ProbeError {
    /// Shorthand for an assertion failure.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Shorthand for a runtime failure.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ProbeError {
    fn from(err: anyhow::Error) -> Self {
        Self::runtime(format!("{:#}", err))
    }
}

/// What happened when a probe ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The procedure completed without error.
    Passed {
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// The procedure returned an error or panicked.
    Failed { message: String },
    /// The capability was not present, so the procedure never ran.
    Skipped,
    /// The probe was declared without a procedure.
    Unimplemented,
}

impl ProbeOutcome {
    /// Whether the probe passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Whether the probe counts against compatibility.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Skipped)
    }

    /// Short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed { .. } => "passed",
            Self::Failed { .. } => "failed",
            Self::Skipped => "skipped",
            Self::Unimplemented => "unimplemented",
        }
    }
}

/// The single result produced for a probe definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeRecord {
    /// Capability name the probe checked.
    pub name: String,
    /// How the probe ended.
    pub outcome: ProbeOutcome,
    /// Declared aliases that did not resolve.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_aliases: Vec<String>,
}

impl ProbeRecord {
    /// Whether any declared alias was missing.
    pub fn has_missing_aliases(&self) -> bool {
        !self.missing_aliases.is_empty()
    }
}
