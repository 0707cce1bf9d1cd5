//! Loader descriptors and their ordered registry.
//!
//! - [`LoaderDescriptor`] - one rule: match pattern, loader reference, options
//! - [`LoaderRegistry`] - insertion-ordered rules with identity-based lookup

pub mod descriptor;
pub mod registry;

pub use descriptor::LoaderDescriptor;
pub use registry::LoaderRegistry;
