//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// capcheck - Capability compatibility harness.
#[derive(Debug, Parser)]
#[command(name = "capcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to manifest file (overrides ./capcheck.yml)
    #[arg(short, long, global = true, env = "CAPCHECK_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe the environment and report a verdict (default if no command specified)
    Run(RunArgs),

    /// List declared probes and their aliases
    List(ListArgs),

    /// Resolve a dotted name in the environment
    Resolve(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Output format: human, json
    #[arg(long, default_value = "human", value_parser = ["human", "json"])]
    pub format: String,

    /// Capability that must pass (overrides the manifest)
    #[arg(long)]
    pub mandatory: Option<String>,

    /// Percentage of implemented probes that must pass (overrides the manifest)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_success_rate: Option<u8>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            mandatory: None,
            min_success_rate: None,
        }
    }
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Dotted path, e.g. fs.promises.read
    pub path: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["capcheck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "capcheck",
            "run",
            "--format",
            "json",
            "--mandatory",
            "fs.read",
            "--min-success-rate",
            "80",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.format, "json");
                assert_eq!(args.mandatory.as_deref(), Some("fs.read"));
                assert_eq!(args.min_success_rate, Some(80));
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn run_rejects_rate_above_hundred() {
        assert!(Cli::try_parse_from(["capcheck", "run", "--min-success-rate", "101"]).is_err());
    }

    #[test]
    fn run_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["capcheck", "run", "--format", "sarif"]).is_err());
    }

    #[test]
    fn global_manifest_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["capcheck", "list", "--manifest", "x.yml"]).unwrap();
        assert_eq!(cli.manifest, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn resolve_requires_path() {
        assert!(Cli::try_parse_from(["capcheck", "resolve"]).is_err());
        let cli = Cli::try_parse_from(["capcheck", "resolve", "a.b"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Resolve(ResolveArgs { ref path })) if path == "a.b"
        ));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
