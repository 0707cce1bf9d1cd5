//! Ordered registry of loader descriptors.
//!
//! Descriptors are identified by substring containment of their loader
//! reference. Several descriptors may share a reference; lookups, updates and
//! deletes always act on the first match in insertion order.

use super::descriptor::{LoaderDescriptor, LOADER_KEY};
use crate::error::{PackrigError, Result};
use crate::lazy::Lazy;
use crate::style::StyleContributions;
use serde_json::{json, Value};
use std::sync::Arc;

/// Ordered collection of loader descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderRegistry {
    descriptors: Vec<LoaderDescriptor>,
}

impl LoaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for `test` handled by `loader`.
    ///
    /// Static `options` are merged into the rule fields as given (so they
    /// usually look like `{"exclude": ..., "options": {...}}`). Deferred
    /// `options` are evaluated on every realization and merged the same way.
    ///
    /// Returns the index of the new descriptor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if `loader` is empty, `test` is not a valid
    /// pattern, or static options are not an object.
    pub fn add(
        &mut self,
        test: &str,
        loader: &str,
        options: impl Into<Lazy<Value>>,
    ) -> Result<usize> {
        let descriptor = LoaderDescriptor::new(test, loader)?;
        let descriptor = match options.into() {
            Lazy::Static(Value::Null) => descriptor,
            Lazy::Static(fields) => descriptor.with_fields(fields)?,
            Lazy::Deferred(evaluator) => {
                let mut descriptor = descriptor;
                descriptor.set_deferred(Some(evaluator));
                descriptor
            }
        };
        Ok(self.push(descriptor))
    }

    /// Append a prebuilt descriptor and return its index.
    pub fn push(&mut self, descriptor: LoaderDescriptor) -> usize {
        tracing::debug!(
            loader = descriptor.loader(),
            test = descriptor.test(),
            "Adding loader"
        );
        self.descriptors.push(descriptor);
        self.descriptors.len() - 1
    }

    /// Index of the first descriptor whose loader reference contains `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.matches(name))
    }

    /// Get a descriptor by index.
    pub fn get(&self, index: usize) -> Option<&LoaderDescriptor> {
        self.descriptors.get(index)
    }

    /// Deep-merge a partial descriptor onto the first match.
    ///
    /// The partial's `loader` field is the name fragment used for lookup and
    /// is not merged; the matched descriptor keeps its full reference. Use
    /// [`LoaderRegistry::set_loader`] to change the reference itself.
    ///
    /// Returns the index of the updated descriptor.
    ///
    /// # Errors
    ///
    /// - `InvalidDescriptor` if `patch` has no string `loader` field or the
    ///   result is not a valid descriptor
    /// - `NotFound` if no descriptor matches
    pub fn update(&mut self, patch: Value) -> Result<usize> {
        let name = patch
            .get(LOADER_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PackrigError::InvalidDescriptor {
                kind: "loader",
                message: "update requires a loader reference".to_string(),
            })?;

        let index = self
            .find(&name)
            .ok_or_else(|| PackrigError::loader_not_found(&name))?;

        let mut patch = patch;
        if let Some(fields) = patch.as_object_mut() {
            fields.remove(LOADER_KEY);
        }

        self.descriptors[index].merge_patch(patch)?;
        tracing::debug!(loader = %name, index, "Updated loader");
        Ok(index)
    }

    /// Replace the loader reference of the first descriptor matching `name`.
    ///
    /// # Errors
    ///
    /// - `InvalidDescriptor` if `loader` is empty
    /// - `NotFound` if no descriptor matches
    pub fn set_loader(&mut self, name: &str, loader: &str) -> Result<usize> {
        let index = self
            .find(name)
            .ok_or_else(|| PackrigError::loader_not_found(name))?;
        self.descriptors[index].merge_patch(json!({ LOADER_KEY: loader }))?;
        tracing::debug!(from = name, to = loader, index, "Replaced loader reference");
        Ok(index)
    }

    /// Replace the deferred evaluator of the first descriptor matching `name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no descriptor matches.
    pub fn set_deferred<F>(&mut self, name: &str, evaluator: F) -> Result<usize>
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let index = self
            .find(name)
            .ok_or_else(|| PackrigError::loader_not_found(name))?;
        self.descriptors[index].set_deferred(Some(Arc::new(evaluator)));
        Ok(index)
    }

    /// Remove the first descriptor matching `name`.
    ///
    /// Missing names are ignored.
    pub fn delete(&mut self, name: &str) -> Option<LoaderDescriptor> {
        let index = self.find(name)?;
        tracing::debug!(loader = name, index, "Deleting loader");
        Some(self.descriptors.remove(index))
    }

    /// Produce the concrete rule list.
    ///
    /// Registry descriptors come first, in insertion order, with deferred
    /// options resolved; the style collaborator's rules follow in their own
    /// order. The registry itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns `Realization` if any deferred evaluator fails.
    pub fn realize(&self, style: &StyleContributions) -> Result<Vec<Value>> {
        let mut rules = Vec::with_capacity(self.descriptors.len() + style.rules.len());
        for descriptor in &self.descriptors {
            rules.push(descriptor.realize()?);
        }
        rules.extend(style.rules.iter().cloned());
        tracing::trace!(count = rules.len(), "Realized loaders");
        Ok(rules)
    }

    /// Iterate over descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &LoaderDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn no_style() -> StyleContributions {
        StyleContributions::default()
    }

    #[test]
    fn find_preserves_insertion_order() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.js$", "babel-loader", Value::Null).unwrap();
        registry.add(r"\.json$", "json-loader", Value::Null).unwrap();

        assert_eq!(registry.find("babel-loader"), Some(0));
        assert_eq!(registry.find("json-loader"), Some(1));
        assert_eq!(registry.find("url-loader"), None);
    }

    #[test]
    fn find_returns_first_of_shared_references() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.vue$", "vue-loader", Value::Null).unwrap();
        registry.add(r"\.css$", "vue-style-loader", Value::Null).unwrap();

        assert_eq!(registry.find("vue"), Some(0));
        assert_eq!(registry.find("style"), Some(1));
    }

    #[test]
    fn add_rejects_missing_loader() {
        let mut registry = LoaderRegistry::new();
        let err = registry.add(r"\.js$", "", Value::Null).unwrap_err();
        assert!(matches!(err, PackrigError::InvalidDescriptor { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn add_rejects_non_object_static_options() {
        let mut registry = LoaderRegistry::new();
        assert!(registry.add(r"\.js$", "babel-loader", json!([1])).is_err());
    }

    #[test]
    fn delete_then_equal_to_fresh_registry() {
        let mut a = LoaderRegistry::new();
        a.add(r"\.js$", "babel-loader", Value::Null).unwrap();
        a.add(r"\.json$", "json-loader", Value::Null).unwrap();
        let removed = a.delete("babel-loader").unwrap();

        let mut b = LoaderRegistry::new();
        b.add(r"\.json$", "json-loader", Value::Null).unwrap();

        assert_eq!(removed.loader(), "babel-loader");
        assert_eq!(a, b);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.js$", "babel-loader", Value::Null).unwrap();
        assert!(registry.delete("ts-loader").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut registry = LoaderRegistry::new();
        registry
            .add(
                r"\.(png|jpe?g|gif|svg)$",
                "url-loader",
                json!({"options": {"limit": 1024, "name": "img/[name].[ext]"}}),
            )
            .unwrap();

        let index = registry
            .update(json!({"loader": "url-loader", "options": {"limit": 8192}}))
            .unwrap();

        let fields = registry.get(index).unwrap().fields();
        assert_eq!(fields["options"]["limit"], json!(8192));
        assert_eq!(fields["options"]["name"], json!("img/[name].[ext]"));
        assert_eq!(fields["test"], json!(r"\.(png|jpe?g|gif|svg)$"));
    }

    #[test]
    fn update_by_fragment_keeps_full_reference() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.css$", "vue-style-loader", Value::Null).unwrap();

        registry
            .update(json!({"loader": "style-loader", "options": {"sourceMap": true}}))
            .unwrap();

        let d = registry.get(0).unwrap();
        assert_eq!(d.loader(), "vue-style-loader");
        assert_eq!(d.fields()["options"]["sourceMap"], json!(true));
    }

    #[test]
    fn set_loader_replaces_reference() {
        let mut registry = LoaderRegistry::new();
        registry
            .add(r"\.css$", "vue-style-loader", json!({"options": {"sourceMap": true}}))
            .unwrap();

        assert_eq!(registry.set_loader("vue-style", "style-loader").unwrap(), 0);

        let d = registry.get(0).unwrap();
        assert_eq!(d.loader(), "style-loader");
        assert_eq!(d.fields()["options"]["sourceMap"], json!(true));
        assert!(matches!(
            registry.set_loader("style", ""),
            Err(PackrigError::InvalidDescriptor { .. })
        ));
        assert!(matches!(
            registry.set_loader("sass", "sass-loader"),
            Err(PackrigError::NotFound { .. })
        ));
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.js$", "babel-loader", Value::Null).unwrap();

        let err = registry
            .update(json!({"loader": "ts-loader", "options": {}}))
            .unwrap_err();

        assert!(matches!(err, PackrigError::NotFound { registry: "loader", .. }));
    }

    #[test]
    fn update_without_loader_is_invalid() {
        let mut registry = LoaderRegistry::new();
        let err = registry.update(json!({"options": {}})).unwrap_err();
        assert!(matches!(err, PackrigError::InvalidDescriptor { .. }));
    }

    #[test]
    fn realize_appends_style_rules_after_registry() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.js$", "babel-loader", Value::Null).unwrap();
        let style = StyleContributions {
            rules: vec![json!({"test": r"\.css$", "use": ["style-loader", "css-loader"]})],
            style_loader_option: json!({}),
        };

        let rules = registry.realize(&style).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["loader"], "babel-loader");
        assert_eq!(rules[1]["test"], r"\.css$");
    }

    #[test]
    fn realize_calls_deferred_every_time_without_mutating() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = LoaderRegistry::new();
        registry
            .add(
                r"\.js$",
                "babel-loader",
                Lazy::deferred(move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"options": {"run": n}}))
                }),
            )
            .unwrap();
        let before = registry.clone();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let first = registry.realize(&no_style()).unwrap();
        let second = registry.realize(&no_style()).unwrap();

        assert_eq!(first[0]["options"]["run"], 0);
        assert_eq!(second[0]["options"]["run"], 1);
        assert_eq!(registry, before);
    }

    #[test]
    fn realize_propagates_evaluator_failure() {
        let mut registry = LoaderRegistry::new();
        registry
            .add(
                r"\.js$",
                "babel-loader",
                Lazy::deferred(|| Err(anyhow::anyhow!("missing .babelrc"))),
            )
            .unwrap();

        let err = registry.realize(&no_style()).unwrap_err();

        assert!(matches!(err, PackrigError::Realization { ref identity, .. } if identity == "babel-loader"));
    }

    #[test]
    fn set_deferred_replaces_evaluator() {
        let mut registry = LoaderRegistry::new();
        registry.add(r"\.js$", "babel-loader", Value::Null).unwrap();
        registry
            .set_deferred("babel", || Ok(json!({"exclude": "node_modules"})))
            .unwrap();

        let rules = registry.realize(&no_style()).unwrap();
        assert_eq!(rules[0]["exclude"], "node_modules");
        assert!(registry.set_deferred("ts", || Ok(json!({}))).is_err());
    }
}
