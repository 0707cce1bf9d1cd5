//! List command implementation.
//!
//! The `packrig list` command shows registered loaders and plugins in
//! realization order, without running any deferred evaluator.

use std::io::Write;

use serde_json::json;

use crate::builder::ConfigBuilder;
use crate::cli::args::ListArgs;
use crate::error::{PackrigError, Result};
use crate::lazy::Enablement;
use crate::plugins::PluginSource;

use super::dispatcher::{Command, CommandResult, TargetSelection};

/// The list command implementation.
pub struct ListCommand {
    selection: TargetSelection,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(selection: TargetSelection, args: ListArgs) -> Self {
        Self { selection, args }
    }
}

fn enablement_label(enabled: &Enablement) -> &'static str {
    match enabled {
        Enablement::Always => "enabled",
        Enablement::Never => "disabled",
        Enablement::When(_) => "conditional",
    }
}

impl Command for ListCommand {
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

        if self.args.json {
            let loaders: Vec<_> = builder
                .loaders()
                .iter()
                .map(|d| {
                    json!({
                        "test": d.test(),
                        "loader": d.loader(),
                        "deferred": d.has_deferred(),
                    })
                })
                .collect();
            let plugins: Vec<_> = builder
                .plugins()
                .iter()
                .map(|d| {
                    json!({
                        "id": d.id().as_str(),
                        "instance": matches!(d.source(), PluginSource::Instance(_)),
                        "state": enablement_label(d.enablement()),
                    })
                })
                .collect();
            let listing = json!({ "loaders": loaders, "plugins": plugins });
            let rendered =
                serde_json::to_string_pretty(&listing).map_err(|e| PackrigError::Other(e.into()))?;
            writeln!(out, "{}", rendered)?;
            return Ok(CommandResult::success());
        }

        writeln!(out, "Loaders:")?;
        for (index, d) in builder.loaders().iter().enumerate() {
            let marker = if d.has_deferred() { " (deferred)" } else { "" };
            writeln!(out, "  {:>2}  {:<28} {}{}", index, d.test(), d.loader(), marker)?;
        }

        writeln!(out)?;
        writeln!(out, "Plugins:")?;
        for (index, d) in builder.plugins().iter().enumerate() {
            writeln!(
                out,
                "  {:>2}  {:<28} {}",
                index,
                d.id().as_str(),
                enablement_label(d.enablement())
            )?;
        }

        Ok(CommandResult::success())
    }
}
