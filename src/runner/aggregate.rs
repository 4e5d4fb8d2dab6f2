//! Result aggregation and the compatibility verdict.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::environment::Environment;
use crate::probe::{CompatibilityFlags, ProbeRegistry};
use crate::report::{success_rate, Report, Verdict};

use super::probe_runner::ProbeRunner;

/// How a verdict is derived from the final counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictPolicy {
    /// Capability whose flag must be set for any compatible verdict.
    pub mandatory: Option<String>,
    /// Percentage of implemented probes that must pass (0-100).
    pub min_success_rate: u8,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            mandatory: None,
            min_success_rate: 100,
        }
    }
}

impl VerdictPolicy {
    /// Policy with a mandatory capability and the default threshold.
    pub fn with_mandatory(name: impl Into<String>) -> Self {
        Self {
            mandatory: Some(name.into()),
            ..Self::default()
        }
    }

    /// Judge a run.
    ///
    /// A missing mandatory flag overrides everything else. Otherwise the
    /// success count is measured against the number of implemented probes.
    pub fn evaluate(
        &self,
        success: usize,
        implemented: usize,
        flags: &CompatibilityFlags,
    ) -> Verdict {
        if let Some(mandatory) = &self.mandatory {
            if !flags.get(mandatory) {
                return Verdict::NotCompatible {
                    reason: format!("{} failed or errored", mandatory),
                };
            }
        }

        let required = implemented as u64 * u64::from(self.min_success_rate.min(100));
        if success as u64 * 100 >= required {
            Verdict::Compatible
        } else {
            Verdict::NotCompatible {
                reason: format!("{} of {} implemented probes passed", success, implemented),
            }
        }
    }
}

/// Waits for a runner to go quiet and renders the report.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    policy: VerdictPolicy,
}

impl Aggregator {
    pub fn new(policy: VerdictPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &VerdictPolicy {
        &self.policy
    }

    /// Await quiescence, then build the report.
    ///
    /// Takes the runner by value so nothing can be launched afterwards.
    pub async fn finish(&self, runner: ProbeRunner) -> Report {
        runner.wait().await;

        let state = runner.state();
        let counts = state.counts();
        let flags = state.flags();
        let implemented = runner.implemented();
        let verdict = self.policy.evaluate(counts.success, implemented, &flags);
        debug!(?counts, implemented, "all probes finished");
        info!(%verdict, "compatibility verdict");

        Report {
            success_rate: success_rate(counts.success, counts.failed),
            success_count: counts.success,
            fail_count: counts.failed,
            undefined_alias_count: counts.undefined_alias,
            declared_count: runner.launched(),
            implemented_count: implemented,
            verdict,
            records: state.records(),
            flags,
            elapsed_ms: runner.started().elapsed().as_millis() as u64,
            finished_at: Utc::now(),
        }
    }
}

/// Run a whole registry against an environment and report.
///
/// ```
/// use capcheck::environment::{Environment, Value};
/// use capcheck::probe::{ProbeProcedure, ProbeRegistry};
/// use capcheck::runner::{run_registry, VerdictPolicy};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let env = Environment::new(Value::map([("clock", Value::callable("now"))]));
/// let mut registry = ProbeRegistry::new();
/// registry.add("clock", ["now"], ProbeProcedure::sync(|ctx| {
///     ctx.capability()?;
///     ctx.mark_compatible();
///     Ok(None)
/// }));
///
/// let report = run_registry(env, registry, VerdictPolicy::with_mandatory("clock")).await;
/// assert!(report.verdict.is_compatible());
/// assert_eq!(report.undefined_alias_count, 1);
/// # });
/// ```
pub async fn run_registry(
    environment: Environment,
    registry: ProbeRegistry,
    policy: VerdictPolicy,
) -> Report {
    let runner = ProbeRunner::new(Arc::new(environment));
    runner.launch_all(registry);
    Aggregator::new(policy).finish(runner).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Value;
    use crate::probe::{ProbeDefinition, ProbeError, ProbeProcedure};

    fn env() -> Environment {
        Environment::new(Value::map([
            ("fs", Value::callable("fs")),
            ("net", Value::callable("net")),
            ("clock", Value::callable("clock")),
            ("fsAlias", Value::callable("fs")),
        ]))
    }

    fn passing() -> ProbeProcedure {
        ProbeProcedure::sync(|ctx| {
            ctx.capability()?;
            ctx.mark_compatible();
            Ok(None)
        })
    }

    fn failing() -> ProbeProcedure {
        ProbeProcedure::sync(|_| Err(ProbeError::assertion("bad result")))
    }

    fn registry(probes: Vec<ProbeDefinition>) -> ProbeRegistry {
        probes.into_iter().collect()
    }

    #[tokio::test]
    async fn all_passing_with_mandatory_is_compatible() {
        let report = run_registry(
            env(),
            registry(vec![
                ProbeDefinition::new("fs", passing()),
                ProbeDefinition::new("net", passing()),
                ProbeDefinition::new("clock", passing()),
            ]),
            VerdictPolicy::with_mandatory("fs"),
        )
        .await;
        assert_eq!(report.verdict, Verdict::Compatible);
        assert_eq!(report.success_rate, Some(100));
        assert_eq!(report.success_count, 3);
    }

    #[tokio::test]
    async fn mandatory_failure_overrides_other_passes() {
        let report = run_registry(
            env(),
            registry(vec![
                ProbeDefinition::new("fs", failing()),
                ProbeDefinition::new("net", passing()),
                ProbeDefinition::new("clock", passing()),
            ]),
            VerdictPolicy {
                mandatory: Some("fs".into()),
                min_success_rate: 0,
            },
        )
        .await;
        assert_eq!(
            report.verdict,
            Verdict::NotCompatible {
                reason: "fs failed or errored".into()
            }
        );
        assert_eq!(report.success_count, 2);
        assert_eq!(report.success_rate, Some(67));
    }

    #[tokio::test]
    async fn partial_alias_resolution_counts_once() {
        let probe = ProbeDefinition::new("fs", passing()).with_aliases(["fsAlias", "filesystem"]);
        let report = run_registry(env(), registry(vec![probe]), VerdictPolicy::default()).await;
        assert_eq!(report.undefined_alias_count, 1);
        assert_eq!(report.records[0].missing_aliases, vec!["filesystem"]);
    }

    #[tokio::test]
    async fn unimplemented_probe_does_not_change_counts() {
        let report = run_registry(
            env(),
            registry(vec![
                ProbeDefinition::new("fs", passing()),
                ProbeDefinition::unimplemented("net"),
            ]),
            VerdictPolicy::default(),
        )
        .await;
        assert_eq!(report.success_count, 1);
        assert_eq!(report.fail_count, 0);
        assert_eq!(report.declared_count, 2);
        assert_eq!(report.implemented_count, 1);
        // Threshold is measured against implemented probes only.
        assert!(report.verdict.is_compatible());
    }

    #[tokio::test]
    async fn outcomes_never_exceed_implemented_probes() {
        let report = run_registry(
            env(),
            registry(vec![
                ProbeDefinition::new("fs", passing()),
                ProbeDefinition::new("gone", passing()),
                ProbeDefinition::new("net", failing()),
                ProbeDefinition::unimplemented("clock"),
            ]),
            VerdictPolicy::default(),
        )
        .await;
        assert!(report.success_count + report.fail_count <= report.implemented_count);
        assert_eq!(report.records.len(), report.declared_count);
    }

    #[tokio::test]
    async fn empty_registry_has_no_success_rate() {
        let report = run_registry(env(), ProbeRegistry::new(), VerdictPolicy::default()).await;
        assert_eq!(report.success_rate, None);
        assert!(report.verdict.is_compatible());
    }

    #[tokio::test]
    async fn passing_duplicate_sets_shared_flag() {
        let report = run_registry(
            env(),
            registry(vec![
                ProbeDefinition::new("fs", passing()),
                ProbeDefinition::new("fs", failing()),
            ]),
            VerdictPolicy {
                mandatory: Some("fs".into()),
                min_success_rate: 0,
            },
        )
        .await;
        assert!(report.flags.get("fs"));
        assert_eq!(report.flags.len(), 1);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.fail_count, 1);
        assert!(report.verdict.is_compatible());
    }

    #[test]
    fn threshold_tracks_live_probe_count() {
        let policy = VerdictPolicy {
            mandatory: None,
            min_success_rate: 75,
        };
        let flags = CompatibilityFlags::new();
        assert!(policy.evaluate(3, 4, &flags).is_compatible());
        assert!(!policy.evaluate(3, 5, &flags).is_compatible());
        assert!(policy.evaluate(6, 8, &flags).is_compatible());
        assert_eq!(
            policy.evaluate(2, 4, &flags),
            Verdict::NotCompatible {
                reason: "2 of 4 implemented probes passed".into()
            }
        );
    }

    #[test]
    fn mandatory_flag_false_is_never_compatible() {
        let policy = VerdictPolicy {
            mandatory: Some("fs".into()),
            min_success_rate: 0,
        };
        let mut flags = CompatibilityFlags::new();
        flags.declare("fs");
        assert!(!policy.evaluate(10, 10, &flags).is_compatible());
        flags.set("fs");
        assert!(policy.evaluate(10, 10, &flags).is_compatible());
    }
}
