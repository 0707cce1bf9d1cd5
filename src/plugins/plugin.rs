//! Plugin instances and constructors.
//!
//! This module provides the core types realized plugin descriptors resolve to:
//!
//! - [`Plugin`] - The trait every realized plugin instance implements
//! - [`PluginId`] - Explicit identity attached to each descriptor
//! - [`PluginConstructor`] - A named function turning arguments into an instance
//! - [`BundlerPlugin`] - Generic instance for a plugin provided by the bundler

use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Identity of a plugin descriptor, usually its constructor name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginId(pub String);

impl PluginId {
    /// Create a new plugin ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete plugin object placed in the final configuration.
pub trait Plugin: Send + Sync + fmt::Debug {
    /// Identity used for registry lookups.
    fn id(&self) -> PluginId;

    /// Representation handed to the bundler.
    fn to_value(&self) -> Value;
}

/// A plugin implemented by the external bundler, recorded by name and the
/// arguments it is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct BundlerPlugin {
    id: PluginId,
    args: Vec<Value>,
}

impl BundlerPlugin {
    pub fn new(id: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id: PluginId::new(id),
            args,
        }
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl Plugin for BundlerPlugin {
    fn id(&self) -> PluginId {
        self.id.clone()
    }

    fn to_value(&self) -> Value {
        json!({ "plugin": self.id.as_str(), "args": self.args })
    }
}

type ConstructFn = dyn Fn(Vec<Value>) -> anyhow::Result<Arc<dyn Plugin>> + Send + Sync;

/// A named constructor invoked at realization time.
#[derive(Clone)]
pub struct PluginConstructor {
    id: PluginId,
    construct: Arc<ConstructFn>,
}

impl PluginConstructor {
    /// Create a constructor from a function of the resolved arguments.
    pub fn new<F>(id: impl Into<String>, construct: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        Self {
            id: PluginId::new(id),
            construct: Arc::new(construct),
        }
    }

    /// Constructor producing a [`BundlerPlugin`] with the given name.
    pub fn bundler(id: impl Into<String>) -> Self {
        let id: String = id.into();
        let name = id.clone();
        Self::new(id, move |args| {
            Ok(Arc::new(BundlerPlugin::new(name.clone(), args)) as Arc<dyn Plugin>)
        })
    }

    pub fn id(&self) -> &PluginId {
        &self.id
    }

    /// Build an instance; absent arguments construct with none.
    pub fn construct(&self, args: Option<Vec<Value>>) -> anyhow::Result<Arc<dyn Plugin>> {
        (self.construct)(args.unwrap_or_default())
    }
}

impl fmt::Debug for PluginConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConstructor")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// What a descriptor realizes from.
#[derive(Debug, Clone)]
pub enum PluginSource {
    /// Already constructed; used verbatim and arguments are ignored.
    Instance(Arc<dyn Plugin>),
    /// Constructed on every realization with the resolved arguments.
    Constructor(PluginConstructor),
}

impl PluginSource {
    pub fn id(&self) -> PluginId {
        match self {
            PluginSource::Instance(plugin) => plugin.id(),
            PluginSource::Constructor(constructor) => constructor.id().clone(),
        }
    }
}

impl From<PluginConstructor> for PluginSource {
    fn from(constructor: PluginConstructor) -> Self {
        PluginSource::Constructor(constructor)
    }
}

impl From<Arc<dyn Plugin>> for PluginSource {
    fn from(plugin: Arc<dyn Plugin>) -> Self {
        PluginSource::Instance(plugin)
    }
}
