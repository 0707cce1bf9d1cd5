//! Stylesheet rules.
//!
//! Style rules depend on whether CSS is extracted into files or injected by a
//! style loader, so they are produced by a [`StyleRules`] collaborator at
//! realization time instead of being registered up front. The produced rules
//! are appended after the loader registry's own rules.

use crate::config::merger::deep_merge;
use crate::error::{PackrigError, Result};
use serde_json::{json, Value};

/// Loader used in place of the style loader when CSS is extracted.
pub const EXTRACT_LOADER: &str = "extract-text-webpack-plugin/dist/loader.js";

/// Plugin that writes extracted CSS to files.
pub const EXTRACT_PLUGIN: &str = "ExtractTextPlugin";

/// Input to a [`StyleRules`] collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOptions {
    /// Write CSS to separate files instead of injecting it.
    pub extract_css: bool,
    /// Loader injecting CSS at runtime.
    pub style_loader_name: String,
    /// Caller options for the style loader; `null` for none.
    pub style_loader_option: Value,
    /// Emit source maps from the CSS loaders.
    pub source_map: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            extract_css: false,
            style_loader_name: "style-loader".to_string(),
            style_loader_option: Value::Null,
            source_map: true,
        }
    }
}

/// Output of a [`StyleRules`] collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleContributions {
    /// Rules appended after the registry's rules.
    pub rules: Vec<Value>,
    /// Options the style loader ends up with.
    pub style_loader_option: Value,
}

/// Produces stylesheet rules for a build.
pub trait StyleRules: Send + Sync {
    fn contribute(&self, options: &StyleOptions) -> Result<StyleContributions>;
}

/// Rules for plain CSS and Sass files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyleRules;

impl DefaultStyleRules {
    fn css_loader(source_map: &Value) -> Value {
        json!({ "loader": "css-loader", "options": { "sourceMap": source_map } })
    }
}

impl StyleRules for DefaultStyleRules {
    fn contribute(&self, options: &StyleOptions) -> Result<StyleContributions> {
        let derived = derive_style_loader_option(options)?;
        let source_map = derived.get("sourceMap").cloned().unwrap_or(Value::Bool(false));

        let first = if options.extract_css {
            json!({ "loader": EXTRACT_LOADER })
        } else {
            json!({ "loader": options.style_loader_name, "options": derived })
        };

        let rules = vec![
            json!({
                "test": r"\.css$",
                "use": [first, Self::css_loader(&source_map)],
            }),
            json!({
                "test": r"\.s[ac]ss$",
                "use": [
                    first,
                    Self::css_loader(&source_map),
                    { "loader": "sass-loader", "options": { "sourceMap": source_map } },
                ],
            }),
        ];

        Ok(StyleContributions {
            rules,
            style_loader_option: derived,
        })
    }
}

/// The caller's style-loader options merged over the defaults.
///
/// # Errors
///
/// Returns `ConfigMerge` if the caller's options are neither `null` nor an
/// object.
pub fn derive_style_loader_option(options: &StyleOptions) -> Result<Value> {
    let defaults = json!({ "sourceMap": options.source_map });
    match &options.style_loader_option {
        Value::Null => Ok(defaults),
        custom @ Value::Object(_) => Ok(deep_merge(&defaults, custom)),
        other => Err(PackrigError::ConfigMerge {
            message: format!("style loader options must be an object, got {}", other),
        }),
    }
}
