//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that need a manifest
//! share a [`ManifestSource`] so discovery and the "no manifest" exit code
//! behave the same everywhere.

pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod resolve;
pub mod run;

pub use dispatcher::{
    Command, CommandDispatcher, CommandResult, ManifestSource, EXIT_NOT_COMPATIBLE,
    EXIT_NO_MANIFEST,
};
