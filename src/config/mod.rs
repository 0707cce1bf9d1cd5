//! Options, build targets, and the merge rules binding them.
//!
//! - Deep merging in [`merger`]
//! - The options tree and its setters in [`store`]
//! - Build target definition in [`target`]
//! - Build target file discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use packrig::config::{load_merged_target, TARGET_FILE};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(TARGET_FILE), "entry:\n  app: ./src/main.js\n").unwrap();
//!
//! let target = load_merged_target(temp.path()).unwrap();
//! assert_eq!(target.public_path, "/");
//! ```

pub mod loader;
pub mod merger;
pub mod store;
pub mod target;

pub use loader::{
    load_merged_target, load_target, load_target_file, load_target_value, TargetPaths,
    LOCAL_TARGET_FILE, TARGET_FILE,
};
pub use merger::{deep_merge, deep_merge_into, merge_configs};
pub use store::{ConfigStore, Options};
pub use target::{BuildTarget, EntryPoint};
