//! Probe execution and result aggregation.
//!
//! - [`probe_runner`] - Launches probes as isolated tokio tasks
//! - [`state`] - Counters, records and flags shared by a run
//! - [`aggregate`] - Quiescence, verdict policy and report building

pub mod aggregate;
pub mod probe_runner;
pub mod state;

pub use aggregate::{run_registry, Aggregator, VerdictPolicy};
pub use probe_runner::ProbeRunner;
pub use state::{ActiveGuard, Counts, RunState};
