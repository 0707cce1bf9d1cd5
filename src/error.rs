//! Error types for packrig operations.
//!
//! This module defines [`PackrigError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Registry lookups that must hit an existing descriptor fail with `NotFound`
//! - Descriptors are validated when added, not when realized
//! - Deferred evaluators return `anyhow::Result`; their failures are wrapped in
//!   `Realization` and abort the whole composition
//! - Deleting a missing descriptor is not an error

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for packrig operations.
#[derive(Debug, Error)]
pub enum PackrigError {
    /// No descriptor in a registry matches the given identity.
    #[error("No {registry} matches '{identity}'")]
    NotFound {
        registry: &'static str,
        identity: String,
    },

    /// A descriptor is missing its identity field or carries an invalid value.
    #[error("Invalid {kind} descriptor: {message}")]
    InvalidDescriptor { kind: &'static str, message: String },

    /// A deferred evaluator failed while realizing a descriptor.
    #[error("Failed to realize '{identity}': {source}")]
    Realization {
        identity: String,
        #[source]
        source: anyhow::Error,
    },

    /// A fragment could not be merged into the options tree.
    #[error("Configuration error: {message}")]
    ConfigMerge { message: String },

    /// Build target file not found at expected location.
    #[error("Build target not found: {path}")]
    TargetNotFound { path: PathBuf },

    /// Failed to parse a build target file.
    #[error("Failed to parse build target at {path}: {message}")]
    TargetParseError { path: PathBuf, message: String },

    /// Build target parsed but holds values that cannot be used.
    #[error("Invalid build target: {message}")]
    InvalidTarget { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PackrigError {
    pub(crate) fn loader_not_found(identity: impl Into<String>) -> Self {
        Self::NotFound {
            registry: "loader",
            identity: identity.into(),
        }
    }

    pub(crate) fn plugin_not_found(identity: impl Into<String>) -> Self {
        Self::NotFound {
            registry: "plugin",
            identity: identity.into(),
        }
    }
}

/// Result type alias for packrig operations.
pub type Result<T> = std::result::Result<T, PackrigError>;
