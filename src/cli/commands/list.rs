//! List command implementation.
//!
//! The `capcheck list` command lists declared probes, their aliases, and
//! whether a check is attached.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::config::{CheckKind, LoadedManifest};
use crate::error::Result;
use crate::ui::{Theme, UserInterface};

use super::dispatcher::{Command, CommandResult, ManifestSource, EXIT_NO_MANIFEST};

/// The list command implementation.
pub struct ListCommand {
    source: ManifestSource,
    args: ListArgs,
}

#[derive(Debug, Serialize)]
struct ProbeEntry<'a> {
    name: &'a str,
    aliases: &'a [String],
    implemented: bool,
    check: Option<CheckKind>,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(source: ManifestSource, args: ListArgs) -> Self {
        Self { source, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }

    fn entries(loaded: &LoadedManifest) -> Vec<ProbeEntry<'_>> {
        loaded
            .manifest
            .probes
            .iter()
            .map(|probe| ProbeEntry {
                name: &probe.name,
                aliases: &probe.aliases,
                implemented: probe.check.is_some(),
                check: probe.check.as_ref().map(|c| c.kind),
            })
            .collect()
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(loaded) = self.source.load(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_MANIFEST));
        };
        let entries = Self::entries(&loaded);

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
            ui.raw(&json);
            return Ok(CommandResult::success());
        }

        let theme = Theme::new();
        ui.show_header(&loaded.display_name());
        for entry in &entries {
            let detail = match entry.check {
                Some(kind) => format!("({})", kind.as_str()),
                None => "(not implemented)".to_string(),
            };
            ui.message(&format!(
                "  {} {}",
                entry.name,
                theme.dim.apply_to(detail)
            ));
            if !entry.aliases.is_empty() {
                ui.message(&format!("    aliases: {}", entry.aliases.join(", ")));
            }
        }
        ui.message("");
        ui.message(&format!(
            "{} probes, {} implemented",
            entries.len(),
            loaded.registry.implemented_count()
        ));

        Ok(CommandResult::success())
    }
}
