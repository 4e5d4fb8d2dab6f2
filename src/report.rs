//! The compatibility report and its renderings.
//!
//! A [`Report`] is built once, after every probe has finished, and is
//! never modified afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::probe::{CompatibilityFlags, ProbeOutcome, ProbeRecord};

/// Final judgment of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Compatible,
    NotCompatible { reason: String },
}

impl Verdict {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compatible => write!(f, "compatible"),
            Self::NotCompatible { reason } => write!(f, "not compatible ({})", reason),
        }
    }
}

/// Snapshot of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Rounded pass percentage over probes that passed or failed.
    pub success_rate: Option<u32>,
    pub success_count: usize,
    pub fail_count: usize,
    /// Probes with at least one unresolved alias.
    pub undefined_alias_count: usize,
    /// Probes in the registry.
    pub declared_count: usize,
    /// Probes in the registry that carry a procedure.
    pub implemented_count: usize,
    pub verdict: Verdict,
    pub records: Vec<ProbeRecord>,
    pub flags: CompatibilityFlags,
    pub elapsed_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// `round(success / (success + failed) * 100)`, or `None` with no outcomes.
pub fn success_rate(success: usize, failed: usize) -> Option<u32> {
    let total = success + failed;
    if total == 0 {
        return None;
    }
    Some((success as f64 / total as f64 * 100.0).round() as u32)
}

impl Report {
    /// Summary lines, optionally preceded by one line per probe.
    pub fn render_human(&self, show_details: bool) -> Vec<String> {
        let mut lines = Vec::new();

        if show_details {
            for record in &self.records {
                lines.push(render_record(record));
                if record.has_missing_aliases() {
                    lines.push(format!(
                        "    undefined aliases: {}",
                        record.missing_aliases.join(", ")
                    ));
                }
            }
            lines.push(String::new());
        }

        let rate = match self.success_rate {
            Some(rate) => format!("{}%", rate),
            None => "n/a".to_string(),
        };
        lines.push(format!("Success rate: {}", rate));
        lines.push(format!("Failed: {}", self.fail_count));
        lines.push(format!("Undefined aliases: {}", self.undefined_alias_count));
        lines.push(format!("Verdict: {}", self.verdict));
        lines
    }

    /// Pretty-printed JSON.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn render_record(record: &ProbeRecord) -> String {
    match &record.outcome {
        ProbeOutcome::Passed { note: Some(note) } => format!("  ✓ {} ({})", record.name, note),
        ProbeOutcome::Passed { note: None } => format!("  ✓ {}", record.name),
        ProbeOutcome::Failed { message } => format!("  ✗ {}: {}", record.name, message),
        ProbeOutcome::Skipped => format!("  ○ {}: capability absent", record.name),
        ProbeOutcome::Unimplemented => format!("  · {}: not implemented", record.name),
    }
}
