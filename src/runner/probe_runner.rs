//! Concurrent probe execution with failure isolation.
//!
//! Each launched probe runs as its own tokio task. Errors and panics in a
//! probe body are caught inside that task and turned into outcomes, so one
//! probe can never abort another or the aggregator.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::environment::Environment;
use crate::probe::{
    ProbeContext, ProbeDefinition, ProbeError, ProbeOutcome, ProbeRecord, ProbeRegistry,
};

use super::state::{ActiveGuard, RunState};

/// Launches probes against an environment and tracks their results.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct ProbeRunner {
    environment: Arc<Environment>,
    state: Arc<RunState>,
    launched: AtomicUsize,
    implemented: AtomicUsize,
    started: Instant,
}

impl ProbeRunner {
    /// Create a runner for the given environment.
    pub fn new(environment: Arc<Environment>) -> Self {
        Self {
            environment,
            state: Arc::new(RunState::new()),
            launched: AtomicUsize::new(0),
            implemented: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Schedule one probe. Returns without waiting for it.
    pub fn launch(&self, probe: ProbeDefinition) {
        let position = self.launched.fetch_add(1, Ordering::SeqCst);
        if probe.is_implemented() {
            self.implemented.fetch_add(1, Ordering::SeqCst);
        }
        self.state.declare_flag(&probe.name);

        let guard = ActiveGuard::acquire(self.state.clone());
        let environment = self.environment.clone();
        let state = self.state.clone();
        debug!(probe = %probe.name, position, "launching probe");

        tokio::spawn(async move {
            let _guard = guard;
            let record = run_probe(&environment, &state, probe).await;
            state.push_record(position, record);
        });
    }

    /// Schedule every probe of a registry, in order.
    pub fn launch_all(&self, registry: ProbeRegistry) {
        for probe in registry {
            self.launch(probe);
        }
    }

    /// Wait until every launched probe has finished.
    pub async fn wait(&self) {
        self.state.quiescent().await;
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Number of probes launched so far.
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    /// Number of launched probes that carried a procedure.
    pub fn implemented(&self) -> usize {
        self.implemented.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> Instant {
        self.started
    }
}

/// Run one probe to completion and produce its record.
async fn run_probe(
    environment: &Arc<Environment>,
    state: &RunState,
    probe: ProbeDefinition,
) -> ProbeRecord {
    let ProbeDefinition {
        name,
        aliases,
        procedure,
    } = probe;

    let outcome = match procedure {
        None => {
            info!(probe = %name, "probe declared but not implemented");
            ProbeOutcome::Unimplemented
        }
        Some(_) if !environment.contains(&name) => {
            state.record_failure();
            info!(probe = %name, "{}", ProbeError::CapabilityAbsent);
            ProbeOutcome::Skipped
        }
        Some(procedure) => {
            let ctx = ProbeContext::new(&name, environment.clone());
            let body = {
                let ctx = ctx.clone();
                async move { procedure.call(ctx).await }
            };
            match AssertUnwindSafe(body).catch_unwind().await {
                Ok(Ok(note)) => {
                    state.record_success();
                    state.commit_flags(ctx.take_staged_flags());
                    debug!(probe = %name, "probe passed");
                    ProbeOutcome::Passed { note }
                }
                Ok(Err(err)) => {
                    state.record_failure();
                    info!(probe = %name, error = %err, "probe failed");
                    ProbeOutcome::Failed {
                        message: err.to_string(),
                    }
                }
                Err(panic) => {
                    state.record_failure();
                    let err = ProbeError::runtime(panic_message(panic.as_ref()));
                    warn!(probe = %name, error = %err, "probe panicked");
                    ProbeOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            }
        }
    };

    let missing_aliases: Vec<String> = aliases
        .into_iter()
        .filter(|alias| !environment.contains(alias))
        .collect();
    if !missing_aliases.is_empty() {
        state.record_undefined_alias();
        let err = ProbeError::AliasMissing {
            aliases: missing_aliases.clone(),
        };
        info!(probe = %name, "{}", err);
    }

    ProbeRecord {
        name,
        outcome,
        missing_aliases,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
