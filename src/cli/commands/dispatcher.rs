//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`TargetSelection`] for locating the build target a command works on
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, ShowArgs};
use crate::config::{load_target, BuildTarget};
use crate::error::Result;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its output to `out`.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
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

/// Where a command finds its build target.
#[derive(Debug, Clone)]
pub struct TargetSelection {
    /// Project root holding packrig.yml.
    pub project_root: PathBuf,
    /// Explicit build target file, loaded without layering.
    pub target_override: Option<PathBuf>,
    /// Force a production build.
    pub production: bool,
}

impl TargetSelection {
    /// Select packrig.yml under `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            target_override: None,
            production: false,
        }
    }

    /// Load the build target, applying the production override.
    pub fn load(&self) -> Result<BuildTarget> {
        let mut target = load_target(&self.project_root, self.target_override.as_deref())?;
        if self.production {
            target.production = true;
        }
        Ok(target)
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
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand runs `show` with default arguments.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        let selection = TargetSelection {
            project_root: self.project_root.clone(),
            target_override: cli.target.clone(),
            production: cli.production,
        };

        match &cli.command {
            Some(Commands::Show(args)) => {
                super::show::ShowCommand::new(selection, args.clone()).execute(out)
            }
            None => super::show::ShowCommand::new(selection, ShowArgs::default()).execute(out),
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(selection, args.clone()).execute(out)
            }
            Some(Commands::Schema) => super::schema::SchemaCommand.execute(out),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TARGET_FILE;
    use clap::Parser;
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
        let result = CommandResult::failure(2);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn selection_applies_production_override() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(TARGET_FILE), "entry:\n  app: ./a.js\n").unwrap();

        let mut selection = TargetSelection::new(temp.path());
        assert!(!selection.load().unwrap().production);

        selection.production = true;
        assert!(selection.load().unwrap().production);
    }

    #[test]
    fn dispatch_without_command_shows_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(TARGET_FILE), "entry:\n  app: ./a.js\n").unwrap();
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let cli = Cli::parse_from(["packrig"]);
        let mut out = Vec::new();

        let result = dispatcher.dispatch(&cli, &mut out).unwrap();

        assert!(result.success);
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["entry"]["app"][0], "./a.js");
    }
}
