//! Show command implementation.
//!
//! The `packrig show` command prints the composed bundler configuration.

use std::io::Write;

use crate::builder::ConfigBuilder;
use crate::cli::args::{OutputFormat, ShowArgs};
use crate::error::{PackrigError, Result};

use super::dispatcher::{Command, CommandResult, TargetSelection};

/// The show command implementation.
pub struct ShowCommand {
    selection: TargetSelection,
    args: ShowArgs,
}

impl ShowCommand {
    /// Create a new show command.
    pub fn new(selection: TargetSelection, args: ShowArgs) -> Self {
        Self { selection, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ShowArgs {
        &self.args
    }
}

impl Command for ShowCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let target = match self.selection.load() {
            Ok(target) => target,
            Err(PackrigError::TargetNotFound { path }) => {
                eprintln!("No build target found at {}", path.display());
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };

        let builder = ConfigBuilder::with_defaults(target)?;
        let config = if self.args.options_only {
            builder.options().into_value()
        } else {
            builder.create()?
        };

        let rendered = match self.args.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&config).map_err(|e| PackrigError::Other(e.into()))?
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config).map_err(|e| PackrigError::Other(e.into()))?
            }
        };
        writeln!(out, "{}", rendered.trim_end())?;

        Ok(CommandResult::success())
    }
}
