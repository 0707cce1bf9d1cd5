//! Structural build options.
//!
//! [`ConfigStore`] owns the options tree (entry, output, resolve, devtool, ...)
//! as an immutable [`Options`] snapshot. Every setter folds a fragment into the
//! current snapshot with [`deep_merge`] and swaps in the result, so a snapshot
//! handed out by [`ConfigStore::options`] never changes afterwards.

use crate::config::merger::deep_merge;
use crate::error::{PackrigError, Result};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// An immutable snapshot of the options tree.
///
/// Cloning is cheap; the tree itself is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Options(Arc<Value>);

impl Options {
    /// An empty options tree.
    pub fn empty() -> Self {
        Self(Arc::new(Value::Object(Map::new())))
    }

    /// Build a snapshot from an object value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMerge` if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        ensure_object(&value)?;
        Ok(Self(Arc::new(value)))
    }

    /// The whole tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a nested option by JSON pointer, e.g. `/output/publicPath`.
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// Produce a new snapshot with `fragment` merged over this one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMerge` if `fragment` is not an object.
    pub fn merged(&self, fragment: &Value) -> Result<Self> {
        ensure_object(fragment)?;
        Ok(Self(Arc::new(deep_merge(&self.0, fragment))))
    }

    /// Take the tree out of the snapshot.
    pub fn into_value(self) -> Value {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

fn ensure_object(fragment: &Value) -> Result<()> {
    if fragment.is_object() {
        Ok(())
    } else {
        Err(PackrigError::ConfigMerge {
            message: format!("options fragment must be an object, got {}", fragment),
        })
    }
}

/// Holder of the options tree and the production flag it was built for.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    options: Options,
    production: bool,
}

impl ConfigStore {
    /// Create an empty store for a production or development build.
    pub fn new(production: bool) -> Self {
        Self {
            options: Options::empty(),
            production,
        }
    }

    /// The current snapshot.
    pub fn options(&self) -> Options {
        self.options.clone()
    }

    /// Whether this store was created for a production build.
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// Merge an arbitrary fragment into the options tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMerge` if `fragment` is not an object; the current
    /// snapshot is left as it was.
    pub fn set_option(&mut self, fragment: Value) -> Result<&mut Self> {
        self.options = self.options.merged(&fragment)?;
        Ok(self)
    }

    /// Merge a mapping of entry names to module paths into `entry`.
    pub fn set_entry(&mut self, entries: Map<String, Value>) -> &mut Self {
        self.apply(json!({ "entry": entries }))
    }

    /// Add or replace one entry point.
    pub fn add_entry(&mut self, name: &str, modules: Vec<String>) -> &mut Self {
        self.apply(json!({ "entry": { name: modules } }))
    }

    pub fn set_output_path(&mut self, path: &str) -> &mut Self {
        self.apply(json!({ "output": { "path": path } }))
    }

    pub fn set_public_path(&mut self, public_path: &str) -> &mut Self {
        self.apply(json!({ "output": { "publicPath": public_path } }))
    }

    pub fn set_filename(&mut self, template: &str) -> &mut Self {
        self.apply(json!({ "output": { "filename": template } }))
    }

    pub fn set_chunk_filename(&mut self, template: &str) -> &mut Self {
        self.apply(json!({ "output": { "chunkFilename": template } }))
    }

    /// Set `resolve.extensions`. Replaces any previous list.
    pub fn set_extensions<I, S>(&mut self, extensions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
        self.apply(json!({ "resolve": { "extensions": extensions } }))
    }

    /// Merge a mapping of module aliases into `resolve.alias`.
    pub fn set_alias(&mut self, aliases: Map<String, Value>) -> &mut Self {
        self.apply(json!({ "resolve": { "alias": aliases } }))
    }

    pub fn add_alias(&mut self, name: &str, path: &str) -> &mut Self {
        self.apply(json!({ "resolve": { "alias": { name: path } } }))
    }

    pub fn set_target(&mut self, target: &str) -> &mut Self {
        self.apply(json!({ "target": target }))
    }

    pub fn set_externals(&mut self, externals: Value) -> &mut Self {
        self.apply(json!({ "externals": externals }))
    }

    /// Set `devtool`, skipped in production builds unless `force` is set.
    pub fn set_dev_tool(&mut self, devtool: impl Into<Value>, force: bool) -> &mut Self {
        let devtool: Value = devtool.into();
        self.apply_unless_production("devtool", json!({ "devtool": devtool }), force)
    }

    /// Merge into `devServer`, skipped in production builds unless `force` is set.
    pub fn set_dev_server(&mut self, dev_server: Value, force: bool) -> &mut Self {
        self.apply_unless_production("devServer", json!({ "devServer": dev_server }), force)
    }

    fn apply_unless_production(&mut self, key: &str, fragment: Value, force: bool) -> &mut Self {
        if self.production && !force {
            tracing::debug!("Skipping {} for production build", key);
            return self;
        }
        self.apply(fragment)
    }

    // Fragments built inside this impl are always objects.
    fn apply(&mut self, fragment: Value) -> &mut Self {
        self.options = Options(Arc::new(deep_merge(self.options.as_value(), &fragment)));
        self
    }
}
