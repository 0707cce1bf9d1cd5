//! Plugin descriptors and their ordered registry.
//!
//! - [`plugin`] - instance trait, identity, constructors
//! - [`descriptor`] - one plugin: source, arguments, enable predicate
//! - [`registry`] - insertion-ordered descriptors with front insertion

pub mod descriptor;
pub mod plugin;
pub mod registry;

pub use descriptor::PluginDescriptor;
pub use plugin::{BundlerPlugin, Plugin, PluginConstructor, PluginId, PluginSource};
pub use registry::PluginRegistry;
