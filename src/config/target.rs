//! Build target definition.
//!
//! A [`BuildTarget`] is the construction input of a
//! [`ConfigBuilder`](crate::builder::ConfigBuilder): entry points, output
//! locations, the production flag and a handful of resolution settings.
//! It maps one-to-one onto the `packrig.yml` file format.

use crate::assets::DEFAULT_HASH_LENGTH;
use crate::error::{PackrigError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Root structure of `packrig.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BuildTarget {
    /// Entry point name to module path(s)
    pub entry: BTreeMap<String, EntryPoint>,

    /// Directory the bundler writes to
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// URL prefix of emitted assets
    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Production build: hashed names, minification, no dev tooling
    #[serde(default, skip_serializing_if = "is_false")]
    pub production: bool,

    /// Length of hash placeholders in file names
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Directory prefix for emitted assets (e.g. `static`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_directory: Option<String>,

    /// Extract CSS into files instead of injecting it
    #[serde(default, skip_serializing_if = "is_false")]
    pub extract_css: bool,

    /// Loader injecting CSS when it is not extracted
    #[serde(default = "default_style_loader")]
    pub style_loader: String,

    /// Options for the style loader
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_loader_options: Option<Value>,

    /// Module aliases
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alias: BTreeMap<String, String>,

    /// Resolved file extensions; defaults apply when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,

    /// Modules left to the runtime environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externals: Option<Value>,

    /// Bundler target platform
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Source map style for development builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,
}

impl Default for BuildTarget {
    fn default() -> Self {
        Self {
            entry: BTreeMap::new(),
            output_path: default_output_path(),
            public_path: default_public_path(),
            production: false,
            hash_length: default_hash_length(),
            asset_directory: None,
            extract_css: false,
            style_loader: default_style_loader(),
            style_loader_options: None,
            alias: BTreeMap::new(),
            extensions: Vec::new(),
            externals: None,
            platform: default_platform(),
            devtool: None,
        }
    }
}

impl BuildTarget {
    /// A development target with a single entry point.
    pub fn new(entry_name: &str, module: &str) -> Self {
        let mut target = Self::default();
        target
            .entry
            .insert(entry_name.to_string(), EntryPoint::Single(module.to_string()));
        target
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` on the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.entry.is_empty() {
            return Err(invalid("at least one entry point is required"));
        }
        for (name, entry) in &self.entry {
            if entry.modules().iter().any(String::is_empty) || entry.modules().is_empty() {
                return Err(invalid(&format!("entry '{}' has no module path", name)));
            }
        }
        if self.public_path.is_empty() {
            return Err(invalid("public_path must not be empty"));
        }
        if self.style_loader.is_empty() {
            return Err(invalid("style_loader must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> PackrigError {
    PackrigError::InvalidTarget {
        message: message.to_string(),
    }
}

/// One entry point: a single module or a list bundled together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EntryPoint {
    Single(String),
    Many(Vec<String>),
}

impl EntryPoint {
    pub fn modules(&self) -> Vec<String> {
        match self {
            EntryPoint::Single(module) => vec![module.clone()],
            EntryPoint::Many(modules) => modules.clone(),
        }
    }
}

fn default_output_path() -> String {
    "dist".to_string()
}

fn default_public_path() -> String {
    "/".to_string()
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

fn default_style_loader() -> String {
    "style-loader".to_string()
}

fn default_platform() -> String {
    "web".to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}
