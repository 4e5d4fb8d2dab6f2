//! capcheck - Capability compatibility harness.
//!
//! capcheck probes a host environment (a nested mapping of named values)
//! for a set of expected capabilities, tallies the outcomes, and decides
//! whether the environment is compatible.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`compare`] - Shallow structural equality
//! - [`config`] - Manifest loading, parsing, and validation
//! - [`environment`] - Environment values and dotted-path resolution
//! - [`error`] - Error types and result aliases
//! - [`probe`] - Probe definitions, outcomes, and the registry
//! - [`report`] - The final report and its renderings
//! - [`runner`] - Concurrent probe execution and the verdict
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use capcheck::environment::{Environment, Value};
//! use capcheck::probe::{ProbeProcedure, ProbeRegistry};
//! use capcheck::runner::{run_registry, VerdictPolicy};
//!
//! let env = Environment::new(Value::map([(
//!     "fs",
//!     Value::map([("read", Value::callable("read"))]),
//! )]));
//!
//! let mut registry = ProbeRegistry::new();
//! registry.add("fs.read", ["fs.readFile"], ProbeProcedure::sync(|ctx| {
//!     ctx.capability()?;
//!     ctx.mark_compatible();
//!     Ok(None)
//! }));
//! registry.declare("net.fetch", Vec::<String>::new());
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let report = runtime.block_on(run_registry(env, registry, VerdictPolicy::default()));
//! assert_eq!(report.success_count, 1);
//! assert_eq!(report.undefined_alias_count, 1);
//! assert!(report.verdict.is_compatible());
//! ```

pub mod cli;
pub mod compare;
pub mod config;
pub mod environment;
pub mod error;
pub mod probe;
pub mod report;
pub mod runner;
pub mod ui;

pub use error::{CapcheckError, Result};
