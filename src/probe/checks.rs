//! Built-in declarative checks.
//!
//! These turn a manifest [`CheckConfig`] into a [`ProbeProcedure`]. Every
//! built-in check stages its own compatibility flag when it passes.

use crate::compare::shallow_equal;
use crate::config::schema::{CheckConfig, CheckKind, ProbeConfig};
use crate::environment::{resolve, Value, ValueCategory};
use crate::error::{CapcheckError, Result};

use super::definition::{ProbeDefinition, ProbeProcedure};
use super::outcome::ProbeError;
use super::registry::ProbeRegistry;

/// Build the procedure for a check.
pub fn procedure_for(probe: &str, check: &CheckConfig) -> Result<ProbeProcedure> {
    let procedure = match check.kind {
        CheckKind::Present => ProbeProcedure::sync(|ctx| {
            ctx.capability()?;
            ctx.mark_compatible();
            Ok(None)
        }),
        CheckKind::Category => {
            let name = required(probe, "category", check.category.as_ref())?;
            let expected: ValueCategory = name
                .parse()
                .map_err(|_| CapcheckError::UnknownCategory { name: name.clone() })?;
            ProbeProcedure::sync(move |ctx| {
                let found = ctx.capability()?.category();
                if found != expected {
                    return Err(ProbeError::assertion(format!(
                        "expected {}, found {}",
                        expected, found
                    )));
                }
                ctx.mark_compatible();
                Ok(None)
            })
        }
        CheckKind::Equals => {
            let expected = yaml_value(probe, check)?;
            if !expected.category().is_plain() {
                return Err(CapcheckError::ManifestValidationError {
                    message: format!(
                        "Probe '{}' compares a {} with `equals`; use `matches` for structures",
                        probe,
                        expected.category()
                    ),
                });
            }
            ProbeProcedure::sync(move |ctx| {
                let found = ctx.capability()?;
                if *found != expected {
                    return Err(ProbeError::assertion(format!(
                        "expected {}, found {}",
                        expected, found
                    )));
                }
                ctx.mark_compatible();
                Ok(None)
            })
        }
        CheckKind::Matches => {
            let expected = yaml_value(probe, check)?;
            ProbeProcedure::sync(move |ctx| {
                let found = ctx.capability()?;
                if !shallow_equal(&expected, found) {
                    return Err(ProbeError::assertion(format!(
                        "{} does not match {}",
                        found, expected
                    )));
                }
                ctx.mark_compatible();
                Ok(None)
            })
        }
        CheckKind::Members => {
            if check.names.is_empty() {
                return Err(missing_field(probe, "names"));
            }
            let names = check.names.clone();
            ProbeProcedure::sync(move |ctx| {
                let capability = ctx.capability()?;
                let missing: Vec<&str> = names
                    .iter()
                    .filter(|n| resolve(Some(capability), n).is_none())
                    .map(String::as_str)
                    .collect();
                if !missing.is_empty() {
                    return Err(ProbeError::assertion(format!(
                        "missing members: {}",
                        missing.join(", ")
                    )));
                }
                ctx.mark_compatible();
                Ok(Some(format!("{} members present", names.len())))
            })
        }
    };
    Ok(procedure)
}

/// Build a probe definition from a manifest entry.
pub fn definition_for(config: &ProbeConfig) -> Result<ProbeDefinition> {
    let definition = match &config.check {
        Some(check) => ProbeDefinition::new(&config.name, procedure_for(&config.name, check)?),
        None => ProbeDefinition::unimplemented(&config.name),
    };
    Ok(definition.with_aliases(config.aliases.iter().cloned()))
}

/// Build a registry from manifest entries, preserving order.
pub fn registry_from(probes: &[ProbeConfig]) -> Result<ProbeRegistry> {
    probes.iter().map(definition_for).collect()
}

fn yaml_value(probe: &str, check: &CheckConfig) -> Result<Value> {
    let yaml = required(probe, "value", check.value.as_ref())?;
    Value::from_yaml(yaml.clone()).map_err(|message| CapcheckError::ManifestValidationError {
        message: format!("Probe '{}' has an invalid value: {}", probe, message),
    })
}

fn required<'a, T>(probe: &str, field: &str, value: Option<&'a T>) -> Result<&'a T> {
    value.ok_or_else(|| missing_field(probe, field))
}

fn missing_field(probe: &str, field: &str) -> CapcheckError {
    CapcheckError::ManifestValidationError {
        message: format!("Probe '{}' check is missing '{}'", probe, field),
    }
}
