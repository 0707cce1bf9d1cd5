//! Build target file discovery and loading.
//!
//! A project describes its build in `packrig.yml` at the project root. An
//! optional `packrig.local.yml` next to it is layered on top with the same
//! deep-merge rules as every other options fragment.

use crate::config::merger::merge_configs;
use crate::config::target::BuildTarget;
use crate::error::{PackrigError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Project build target file name.
pub const TARGET_FILE: &str = "packrig.yml";

/// Local override file name.
pub const LOCAL_TARGET_FILE: &str = "packrig.local.yml";

/// Paths to build target files in merge order (later overrides earlier).
#[derive(Debug, Clone)]
pub struct TargetPaths {
    /// Project file: packrig.yml
    pub project: Option<PathBuf>,

    /// Local overrides: packrig.local.yml
    pub project_local: Option<PathBuf>,
}

impl TargetPaths {
    /// Discover build target files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(TARGET_FILE)),
            project_local: existing(project_root.join(LOCAL_TARGET_FILE)),
        }
    }

    /// Returns all existing paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if the project file exists.
    pub fn has_project_target(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a single file as a raw value (for merging).
///
/// # Errors
///
/// Returns `TargetNotFound` if the file doesn't exist.
/// Returns `TargetParseError` if the YAML is invalid.
pub fn load_target_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackrigError::TargetNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PackrigError::Io(e)
        }
    })?;

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| PackrigError::TargetParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // An empty file parses to null; treat it as "no settings".
    Ok(if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    })
}

/// Load one file into a validated [`BuildTarget`], without layering.
pub fn load_target_file(path: &Path) -> Result<BuildTarget> {
    let value = load_target_value(path)?;
    parse_target(value, path)
}

/// Load and merge `packrig.yml` and `packrig.local.yml`.
///
/// # Errors
///
/// Returns `TargetNotFound` if `packrig.yml` does not exist.
/// Returns `TargetParseError` if a file or the merged result is invalid.
/// Returns `InvalidTarget` if the merged target fails validation.
pub fn load_merged_target(project_root: &Path) -> Result<BuildTarget> {
    let paths = TargetPaths::discover(project_root);

    if !paths.has_project_target() {
        return Err(PackrigError::TargetNotFound {
            path: project_root.join(TARGET_FILE),
        });
    }

    let mut values = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading build target from {}", path.display());
        values.push(load_target_value(path)?);
    }

    parse_target(merge_configs(&values), &project_root.join(TARGET_FILE))
}

/// Load a build target with optional path override.
///
/// If `target_override` is provided, loads only that file without merging.
pub fn load_target(project_root: &Path, target_override: Option<&Path>) -> Result<BuildTarget> {
    match target_override {
        Some(path) => load_target_file(path),
        None => load_merged_target(project_root),
    }
}

fn parse_target(value: Value, source_path: &Path) -> Result<BuildTarget> {
    let target: BuildTarget =
        serde_json::from_value(value).map_err(|e| PackrigError::TargetParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    target.validate()?;
    Ok(target)
}
