//! Probe definitions, outcomes and the probe registry.
//!
//! A probe checks one named capability of the environment. Probe bodies
//! are supplied by the caller as [`ProbeProcedure`]s, or built from a
//! manifest through the declarative [`checks`].
//!
//! # Modules
//!
//! - [`definition`] - Probe definitions, procedures and the probe context
//! - [`outcome`] - Outcomes, records and probe-level errors
//! - [`flags`] - Per-capability compatibility flags
//! - [`registry`] - Ordered probe catalogue
//! - [`checks`] - Built-in declarative checks
//!
//! # Example
//!
//! ```
//! use capcheck::probe::{ProbeError, ProbeProcedure, ProbeRegistry};
//!
//! let mut registry = ProbeRegistry::new();
//! registry.add(
//!     "crypto.random",
//!     ["getRandomValues"],
//!     ProbeProcedure::sync(|ctx| {
//!         let value = ctx.capability()?;
//!         if value.category().is_plain() {
//!             return Err(ProbeError::assertion("not callable"));
//!         }
//!         ctx.mark_compatible();
//!         Ok(None)
//!     }),
//! );
//! registry.declare("crypto.subtle", ["subtle"]);
//! assert_eq!(registry.implemented_count(), 1);
//! ```

pub mod checks;
pub mod definition;
pub mod flags;
pub mod outcome;
pub mod registry;

pub use definition::{ProbeContext, ProbeDefinition, ProbeProcedure, ProbeResult};
pub use flags::CompatibilityFlags;
pub use outcome::{ProbeError, ProbeOutcome, ProbeRecord};
pub use registry::ProbeRegistry;
