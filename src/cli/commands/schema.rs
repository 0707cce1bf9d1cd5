//! Schema command implementation.
//!
//! The `packrig schema` command prints a JSON Schema for `packrig.yml`,
//! for editor autocomplete and validation.

use std::io::Write;

use crate::config::BuildTarget;
use crate::error::{PackrigError, Result};

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

/// JSON Schema describing a build target file.
pub fn target_schema() -> Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(BuildTarget))
        .map_err(|e| PackrigError::Other(e.into()))
}

impl Command for SchemaCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let rendered = serde_json::to_string_pretty(&target_schema()?)
            .map_err(|e| PackrigError::Other(e.into()))?;
        writeln!(out, "{}", rendered)?;
        Ok(CommandResult::success())
    }
}
