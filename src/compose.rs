//! Composition of the final bundler configuration.
//!
//! [`compose`] realizes both registries and folds the result into an options
//! snapshot:
//!
//! ```text
//! options  <-  { module: { rules: <realized loaders> }, plugins: <realized plugins> }
//! ```
//!
//! Nothing is mutated, so composing twice without changes in between yields
//! structurally equal values as long as the deferred evaluators are
//! deterministic.

use crate::config::merger::deep_merge;
use crate::config::store::Options;
use crate::error::Result;
use crate::loaders::LoaderRegistry;
use crate::plugins::PluginRegistry;
use crate::style::StyleContributions;
use serde_json::{json, Value};

/// Realize `loaders` and `plugins` and merge them over `options`.
///
/// # Errors
///
/// Returns the first `Realization` error raised by a deferred evaluator,
/// predicate or constructor; no partial configuration is produced.
pub fn compose(
    options: &Options,
    loaders: &LoaderRegistry,
    plugins: &PluginRegistry,
    style: &StyleContributions,
) -> Result<Value> {
    let rules = loaders.realize(style)?;
    let plugins: Vec<Value> = plugins
        .realize()?
        .iter()
        .map(|plugin| plugin.to_value())
        .collect();

    tracing::debug!(
        rules = rules.len(),
        plugins = plugins.len(),
        "Composing configuration"
    );

    let realized = json!({
        "module": { "rules": rules },
        "plugins": plugins,
    });
    Ok(deep_merge(options.as_value(), &realized))
}
