//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{find_manifest, LoadedManifest};
use crate::error::Result;
use crate::ui::UserInterface;

/// Exit code when the environment is not compatible.
pub const EXIT_NOT_COMPATIBLE: i32 = 1;

/// Exit code when no manifest could be found.
pub const EXIT_NO_MANIFEST: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where a command should read its manifest from.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    project_root: PathBuf,
    explicit: Option<PathBuf>,
}

impl ManifestSource {
    pub fn new(project_root: &Path, explicit: Option<PathBuf>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            explicit,
        }
    }

    /// The manifest path, if one was given or discovered.
    ///
    /// Relative explicit paths are taken relative to the project root.
    pub fn path(&self) -> Option<PathBuf> {
        match &self.explicit {
            Some(path) => Some(self.project_root.join(path)),
            None => find_manifest(&self.project_root),
        }
    }

    /// Load the manifest, reporting to the UI when there is none.
    ///
    /// `Ok(None)` means no manifest was found and the caller should exit
    /// with [`EXIT_NO_MANIFEST`].
    pub fn load(&self, ui: &mut dyn UserInterface) -> Result<Option<LoadedManifest>> {
        let Some(path) = self.path() else {
            ui.error("No manifest found. Create capcheck.yml or pass --manifest.");
            return Ok(None);
        };
        LoadedManifest::load(&path).map(Some)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = ManifestSource::new(&self.project_root, cli.manifest.clone());
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Resolve(args)) => {
                super::resolve::ResolveCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(source, RunArgs::default()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(EXIT_NOT_COMPATIBLE);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn explicit_manifest_is_relative_to_project() {
        let source = ManifestSource::new(Path::new("/proj"), Some(PathBuf::from("m.yml")));
        assert_eq!(source.path(), Some(PathBuf::from("/proj/m.yml")));
    }

    #[test]
    fn missing_manifest_reports_error() {
        let temp = TempDir::new().unwrap();
        let source = ManifestSource::new(temp.path(), None);
        let mut ui = MockUI::new();
        assert!(source.load(&mut ui).unwrap().is_none());
        assert!(ui.errors()[0].contains("No manifest found"));
    }

    #[test]
    fn dispatch_without_subcommand_runs() {
        use clap::Parser;

        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("capcheck.yml"),
            "environment: {fs: 1}\nprobes:\n  - name: fs\n    check: {kind: present}\n",
        )
        .unwrap();
        let cli = Cli::parse_from(["capcheck"]);
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let mut ui = MockUI::new();
        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert!(result.success);
        assert_eq!(dispatcher.project_root(), temp.path());
    }
}
