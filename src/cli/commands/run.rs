//! Run command implementation.
//!
//! The `capcheck run` command launches every declared probe against the
//! manifest's environment, waits for all of them to settle, and prints
//! the report. It is also what runs when no subcommand is given.

use tracing::debug;

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::report::Report;
use crate::runner::{run_registry, VerdictPolicy};
use crate::ui::UserInterface;

use super::dispatcher::{
    Command, CommandResult, ManifestSource, EXIT_NOT_COMPATIBLE, EXIT_NO_MANIFEST,
};

/// The run command implementation.
pub struct RunCommand {
    source: ManifestSource,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(source: ManifestSource, args: RunArgs) -> Self {
        Self { source, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Apply command-line overrides on top of the manifest's policy.
    fn policy(&self, base: VerdictPolicy) -> VerdictPolicy {
        VerdictPolicy {
            mandatory: self.args.mandatory.clone().or(base.mandatory),
            min_success_rate: self.args.min_success_rate.unwrap_or(base.min_success_rate),
        }
    }

    fn print_human(&self, title: &str, report: &Report, ui: &mut dyn UserInterface) {
        let show_details = ui.output_mode().shows_details();
        ui.show_header(title);

        let mut lines = report.render_human(show_details);
        let verdict = lines.pop().unwrap_or_default();
        for line in &lines {
            ui.message(line);
        }
        if report.verdict.is_compatible() {
            ui.success(&verdict);
        } else {
            ui.warning(&verdict);
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(loaded) = self.source.load(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_MANIFEST));
        };

        let policy = self.policy(loaded.policy());
        let title = loaded.display_name();
        debug!(?policy, probes = loaded.registry.len(), "starting run");

        // Probes are cooperative tasks on one thread.
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        let report = runtime.block_on(run_registry(loaded.environment, loaded.registry, policy));

        if self.args.format == "json" {
            let json = report.render_json().map_err(anyhow::Error::from)?;
            ui.raw(&json);
        } else {
            self.print_human(&title, &report, ui);
        }

        if report.verdict.is_compatible() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(EXIT_NOT_COMPATIBLE))
        }
    }
}
