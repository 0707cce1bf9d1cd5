//! Plugin descriptor definition.

use super::plugin::{Plugin, PluginId, PluginSource};
use crate::error::{PackrigError, Result};
use crate::lazy::{Enablement, Lazy};
use serde_json::Value;
use std::sync::Arc;

/// A record describing a plugin to instantiate, its arguments, and whether
/// it is active.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    id: PluginId,
    source: PluginSource,
    args: Option<Lazy<Vec<Value>>>,
    enabled: Enablement,
}

impl PluginDescriptor {
    /// Describe a plugin, always enabled and without arguments.
    pub fn new(source: impl Into<PluginSource>) -> Self {
        let source = source.into();
        Self {
            id: source.id(),
            source,
            args: None,
            enabled: Enablement::Always,
        }
    }

    pub fn with_args(mut self, args: impl Into<Lazy<Vec<Value>>>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn enabled(mut self, enabled: impl Into<Enablement>) -> Self {
        self.enabled = enabled.into();
        self
    }

    pub fn id(&self) -> &PluginId {
        &self.id
    }

    pub fn source(&self) -> &PluginSource {
        &self.source
    }

    pub fn args(&self) -> Option<&Lazy<Vec<Value>>> {
        self.args.as_ref()
    }

    pub fn enablement(&self) -> &Enablement {
        &self.enabled
    }

    pub(crate) fn set_args(&mut self, args: Lazy<Vec<Value>>) {
        self.args = Some(args);
    }

    pub(crate) fn set_enablement(&mut self, enabled: Enablement) {
        self.enabled = enabled;
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(PackrigError::InvalidDescriptor {
                kind: "plugin",
                message: "missing constructor reference".to_string(),
            });
        }
        Ok(())
    }

    /// Realize this descriptor.
    ///
    /// Returns `None` when the enable predicate is false. Instances are
    /// returned as is; constructors are invoked with the resolved arguments.
    ///
    /// # Errors
    ///
    /// Returns `Realization` if the predicate, the argument evaluator or the
    /// constructor fails.
    pub fn realize(&self) -> Result<Option<Arc<dyn Plugin>>> {
        let enabled = self
            .enabled
            .evaluate()
            .map_err(|source| self.realization_error(source))?;
        if !enabled {
            tracing::trace!(plugin = %self.id, "Plugin disabled");
            return Ok(None);
        }

        let plugin = match &self.source {
            PluginSource::Instance(plugin) => Arc::clone(plugin),
            PluginSource::Constructor(constructor) => {
                let args = self
                    .args
                    .as_ref()
                    .map(Lazy::resolve)
                    .transpose()
                    .map_err(|source| self.realization_error(source))?;
                constructor
                    .construct(args)
                    .map_err(|source| self.realization_error(source))?
            }
        };
        Ok(Some(plugin))
    }

    fn realization_error(&self, source: anyhow::Error) -> PackrigError {
        PackrigError::Realization {
            identity: self.id.to_string(),
            source,
        }
    }
}
