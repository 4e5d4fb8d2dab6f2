//! Manifest validation rules.
//!
//! This module validates a manifest before anything runs:
//! - Probe names and aliases must be non-empty
//! - `mandatory` must name a declared probe
//! - `min_success_rate` must be a percentage
//! - The environment comes from one place only
//! - Duplicate probe names are allowed but flagged

use std::collections::HashSet;

use crate::config::schema::Manifest;
use crate::error::{CapcheckError, Result};

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Validation finding with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable message
    pub message: String,
    /// Probe name if the finding is probe-specific
    pub probe: Option<String>,
    pub severity: Severity,
}

impl ValidationError {
    fn error(rule: &str, message: String, probe: Option<&str>) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            probe: probe.map(str::to_string),
            severity: Severity::Error,
        }
    }

    fn warning(rule: &str, message: String, probe: Option<&str>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, message, probe)
        }
    }
}

/// Validate a manifest and return every finding.
pub fn validate_manifest(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_probes(manifest));
    errors.extend(validate_policy(manifest));

    if manifest.environment.is_some() && manifest.environment_file.is_some() {
        errors.push(ValidationError::error(
            "conflicting-environment",
            "Manifest sets both 'environment' and 'environment_file'".to_string(),
            None,
        ));
    }

    errors
}

/// Validate and fail on the first error-level finding.
pub fn validate(manifest: &Manifest) -> Result<()> {
    let errors: Vec<_> = validate_manifest(manifest)
        .into_iter()
        .filter(|e| e.severity == Severity::Error)
        .map(|e| e.message)
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CapcheckError::ManifestValidationError {
            message: errors.join("; "),
        })
    }
}

fn validate_probes(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, probe) in manifest.probes.iter().enumerate() {
        if probe.name.trim().is_empty() {
            errors.push(ValidationError::error(
                "empty-name",
                format!("Probe #{} has an empty name", index + 1),
                None,
            ));
            continue;
        }

        if !seen.insert(probe.name.as_str()) {
            errors.push(ValidationError::warning(
                "duplicate-probe",
                format!("Probe '{}' is declared more than once", probe.name),
                Some(&probe.name),
            ));
        }

        if probe.aliases.iter().any(|a| a.trim().is_empty()) {
            errors.push(ValidationError::error(
                "empty-alias",
                format!("Probe '{}' has an empty alias", probe.name),
                Some(&probe.name),
            ));
        }
    }

    errors
}

fn validate_policy(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if manifest.min_success_rate > 100 {
        errors.push(ValidationError::error(
            "invalid-success-rate",
            format!(
                "min_success_rate must be between 0 and 100, got {}",
                manifest.min_success_rate
            ),
            None,
        ));
    }

    if let Some(mandatory) = &manifest.mandatory {
        if !manifest.probes.iter().any(|p| &p.name == mandatory) {
            errors.push(ValidationError::error(
                "unknown-mandatory",
                format!("Mandatory capability '{}' has no probe", mandatory),
                Some(mandatory),
            ));
        }
    }

    errors
}
