//! Resolve command implementation.
//!
//! The `capcheck resolve <path>` command looks up one dotted name in the
//! manifest's environment and prints its category and value.

use crate::cli::args::ResolveArgs;
use crate::environment::split_path;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ManifestSource, EXIT_NO_MANIFEST};

/// The resolve command implementation.
pub struct ResolveCommand {
    source: ManifestSource,
    args: ResolveArgs,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(source: ManifestSource, args: ResolveArgs) -> Self {
        Self { source, args }
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(loaded) = self.source.load(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_MANIFEST));
        };
        let path = self.args.path.as_str();

        match loaded.environment.resolve(path) {
            Some(value) => {
                ui.success(&format!("{} is {}", path, value.category()));
                ui.message(&format!("  {}", value));
                Ok(CommandResult::success())
            }
            None => {
                let (head, _) = split_path(path);
                if head != path && !loaded.environment.contains(head) {
                    ui.warning(&format!("{} not found ({} is missing)", path, head));
                } else {
                    ui.warning(&format!("{} not found", path));
                }
                Ok(CommandResult::failure(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn resolve(path: &str) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("capcheck.yml"),
            "environment:\n  fs:\n    read: !callable readFile\n    limit: 4\nprobes: []\n",
        )
        .unwrap();
        let mut ui = MockUI::new();
        let result = ResolveCommand::new(
            ManifestSource::new(temp.path(), None),
            ResolveArgs { path: path.into() },
        )
        .execute(&mut ui)
        .unwrap();
        (result, ui)
    }

    #[test]
    fn resolves_nested_callable() {
        let (result, ui) = resolve("fs.read");
        assert!(result.success);
        assert_eq!(ui.successes(), ["fs.read is callable"]);
    }

    #[test]
    fn resolves_plain_value() {
        let (_, ui) = resolve("fs.limit");
        assert_eq!(ui.successes(), ["fs.limit is number"]);
        assert!(ui.messages()[0].contains('4'));
    }

    #[test]
    fn missing_leaf() {
        let (result, ui) = resolve("fs.write");
        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.warnings(), ["fs.write not found"]);
    }

    #[test]
    fn missing_prefix_is_named() {
        let (result, ui) = resolve("net.fetch");
        assert!(!result.success);
        assert_eq!(ui.warnings(), ["net.fetch not found (net is missing)"]);
    }
}
