//! Manifest schema.
//!
//! A manifest names the environment under test and the probes to run:
//!
//! ```yaml
//! name: web runtime
//! mandatory: fs.read
//! min_success_rate: 100
//! environment:
//!   fs:
//!     read: !callable readFile
//! probes:
//!   - name: fs.read
//!     aliases: [readFile]
//!     check:
//!       kind: category
//!       category: callable
//!   - name: net.fetch        # no check: declared but not implemented
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_min_success_rate() -> u8 {
    100
}

/// Top-level manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manifest {
    /// Display name for the environment being checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Capability whose probe must pass for any compatible verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<String>,

    /// Percentage of implemented probes that must pass.
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate: u8,

    /// Inline environment document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_yaml::Value>,

    /// Environment file, relative to the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_file: Option<PathBuf>,

    /// Probes in launch order.
    #[serde(default)]
    pub probes: Vec<ProbeConfig>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            name: None,
            mandatory: None,
            min_success_rate: default_min_success_rate(),
            environment: None,
            environment_file: None,
            probes: Vec::new(),
        }
    }
}

/// One probe entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Dotted capability path.
    pub name: String,

    /// Alternate paths that should also resolve.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Built-in check to run. Absent means declared but not implemented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<CheckConfig>,
}

/// Kind of built-in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// The capability resolves.
    Present,
    /// The capability has a given value category.
    Category,
    /// The capability exactly equals a plain value.
    Equals,
    /// The capability is shallowly equal to a structure.
    Matches,
    /// Every listed sub-path resolves under the capability.
    Members,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Category => "category",
            Self::Equals => "equals",
            Self::Matches => "matches",
            Self::Members => "members",
        }
    }
}

// A flat struct rather than an internally tagged enum: tagged enums buffer
// their content and would drop YAML tags like `!callable` from `value`.
/// A built-in check.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckConfig {
    pub kind: CheckKind,

    /// For `category`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// For `equals` and `matches`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_yaml::Value>,

    /// For `members`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

impl CheckConfig {
    /// A check with only a kind set.
    pub fn of(kind: CheckKind) -> Self {
        Self {
            kind,
            category: None,
            value: None,
            names: Vec::new(),
        }
    }
}
