//! Packrig - bundler configuration composition.
//!
//! Packrig assembles a bundler configuration from ordered registries of
//! loader rules and plugins plus a tree of structural options, then realizes
//! everything (deferred options, enable predicates, plugin construction) into
//! one final value.
//!
//! # Modules
//!
//! - [`assets`] - Hashed output file-name templates
//! - [`builder`] - The [`ConfigBuilder`] façade and its default rules and plugins
//! - [`cli`] - Command-line interface and argument parsing
//! - [`compose`] - Realization of both registries into the final configuration
//! - [`config`] - Deep merge, options store, build target loading
//! - [`error`] - Error types and result aliases
//! - [`lazy`] - Deferred values and enable predicates
//! - [`loaders`] - Loader descriptors and registry
//! - [`plugins`] - Plugin descriptors, constructors and registry
//! - [`style`] - Stylesheet rules contributed at realization time
//!
//! # Example
//!
//! ```
//! use packrig::builder::ConfigBuilder;
//! use packrig::config::BuildTarget;
//! use serde_json::json;
//!
//! let mut builder = ConfigBuilder::with_defaults(BuildTarget::new("app", "./src/main.js")).unwrap();
//! builder
//!     .loaders_mut()
//!     .update(json!({"loader": "url-loader", "options": {"limit": 4096}}))
//!     .unwrap();
//!
//! let config = builder.create().unwrap();
//! assert_eq!(config["module"]["rules"][2]["options"]["limit"], 4096);
//! ```

pub mod assets;
pub mod builder;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod lazy;
pub mod loaders;
pub mod plugins;
pub mod style;

pub use builder::ConfigBuilder;
pub use error::{PackrigError, Result};
