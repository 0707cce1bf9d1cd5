//! Ordered registry of plugin descriptors.
//!
//! Descriptors are identified by exact equality of their [`PluginId`].
//! Appended descriptors run in insertion order; [`PluginRegistry::add_front`]
//! places descriptors ahead of everything registered so far, for plugins
//! that must run before others (a module replacement ahead of a general
//! ignore rule, for example).

use super::descriptor::PluginDescriptor;
use super::plugin::{Plugin, PluginSource};
use crate::error::{PackrigError, Result};
use crate::lazy::{Enablement, Lazy};
use serde_json::Value;
use std::sync::Arc;

/// Ordered collection of plugin descriptors.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin.
    ///
    /// Returns the index of the new descriptor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if the source has an empty identity.
    pub fn add(
        &mut self,
        source: impl Into<PluginSource>,
        args: Option<Lazy<Vec<Value>>>,
        enabled: impl Into<Enablement>,
    ) -> Result<usize> {
        let mut descriptor = PluginDescriptor::new(source).enabled(enabled);
        if let Some(args) = args {
            descriptor = descriptor.with_args(args);
        }
        self.push(descriptor)
    }

    /// Append a prebuilt descriptor and return its index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if the descriptor has an empty identity.
    pub fn push(&mut self, descriptor: PluginDescriptor) -> Result<usize> {
        descriptor.validate()?;
        tracing::debug!(plugin = %descriptor.id(), "Adding plugin");
        self.descriptors.push(descriptor);
        Ok(self.descriptors.len() - 1)
    }

    /// Prepend descriptors, keeping their relative order.
    ///
    /// Nothing is inserted if any descriptor is invalid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if any descriptor has an empty identity.
    pub fn add_front<I>(&mut self, descriptors: I) -> Result<()>
    where
        I: IntoIterator<Item = PluginDescriptor>,
    {
        let front: Vec<PluginDescriptor> = descriptors.into_iter().collect();
        for descriptor in &front {
            descriptor.validate()?;
        }
        tracing::debug!(
            plugins = ?front.iter().map(|d| d.id().as_str()).collect::<Vec<_>>(),
            "Adding plugins at front"
        );
        self.descriptors.splice(0..0, front);
        Ok(())
    }

    /// Index of the first descriptor whose identity equals `id`.
    pub fn find(&self, id: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.id().as_str() == id)
    }

    /// Get a descriptor by index.
    pub fn get(&self, index: usize) -> Option<&PluginDescriptor> {
        self.descriptors.get(index)
    }

    /// Update the arguments and optionally the predicate of the first match.
    ///
    /// Arguments follow the options merge rules: a new argument list replaces
    /// the old one wholesale, and a deferred value replaces whatever was
    /// registered. `None` leaves the current arguments alone.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no descriptor matches `id`.
    pub fn update(
        &mut self,
        id: &str,
        args: Option<Lazy<Vec<Value>>>,
        enabled: Option<Enablement>,
    ) -> Result<usize> {
        let index = self
            .find(id)
            .ok_or_else(|| PackrigError::plugin_not_found(id))?;
        let descriptor = &mut self.descriptors[index];

        if let Some(args) = args {
            descriptor.set_args(args);
        }
        if let Some(enabled) = enabled {
            descriptor.set_enablement(enabled);
        }

        tracing::debug!(plugin = id, index, "Updated plugin");
        Ok(index)
    }

    /// Remove the first descriptor whose identity equals `id`.
    ///
    /// Missing identities are ignored.
    pub fn delete(&mut self, id: &str) -> Option<PluginDescriptor> {
        let index = self.find(id)?;
        tracing::debug!(plugin = id, index, "Deleting plugin");
        Some(self.descriptors.remove(index))
    }

    /// Produce the ordered list of enabled plugin instances.
    ///
    /// Predicates and deferred arguments are evaluated on every call.
    ///
    /// # Errors
    ///
    /// Returns `Realization` if any predicate, evaluator or constructor fails.
    pub fn realize(&self) -> Result<Vec<Arc<dyn Plugin>>> {
        let mut plugins = Vec::with_capacity(self.descriptors.len());
        for descriptor in &self.descriptors {
            if let Some(plugin) = descriptor.realize()? {
                plugins.push(plugin);
            }
        }
        tracing::trace!(count = plugins.len(), "Realized plugins");
        Ok(plugins)
    }

    /// Iterate over descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
