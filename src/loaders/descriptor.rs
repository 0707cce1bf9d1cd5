//! Loader descriptor definition.

use crate::config::merger::deep_merge_into;
use crate::error::{PackrigError, Result};
use crate::lazy::Evaluator;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Key holding the file-name pattern of a rule.
pub const TEST_KEY: &str = "test";

/// Key holding the loader reference of a rule.
pub const LOADER_KEY: &str = "loader";

/// A rule mapping a file-name pattern to a loader plus its options.
///
/// Static fields always contain string `test` and `loader` keys. An optional
/// deferred evaluator produces a fragment that is merged over the static
/// fields when the descriptor is realized.
#[derive(Clone)]
pub struct LoaderDescriptor {
    fields: Map<String, Value>,
    deferred: Option<Evaluator<Value>>,
}

impl LoaderDescriptor {
    /// Create a descriptor for files matching `test`, handled by `loader`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if `loader` is empty or `test` is not a
    /// valid regular expression.
    pub fn new(test: &str, loader: &str) -> Result<Self> {
        let mut fields = Map::new();
        fields.insert(TEST_KEY.to_string(), Value::String(test.to_string()));
        fields.insert(LOADER_KEY.to_string(), Value::String(loader.to_string()));
        validate(&fields)?;
        Ok(Self {
            fields,
            deferred: None,
        })
    }

    /// Merge extra static fields (`exclude`, `options`, `enforce`, ...).
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if `extra` is not an object or would
    /// break the `test`/`loader` fields.
    pub fn with_fields(mut self, extra: Value) -> Result<Self> {
        self.merge_patch(extra)?;
        Ok(self)
    }

    /// Attach a deferred evaluator, replacing any previous one.
    pub fn with_deferred<F>(mut self, evaluator: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.deferred = Some(Arc::new(evaluator));
        self
    }

    pub(crate) fn set_deferred(&mut self, evaluator: Option<Evaluator<Value>>) {
        self.deferred = evaluator;
    }

    /// The file-name pattern.
    pub fn test(&self) -> &str {
        self.fields
            .get(TEST_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The loader reference used for identity matching.
    pub fn loader(&self) -> &str {
        self.fields
            .get(LOADER_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Static fields, without the deferred contribution.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    /// Whether this descriptor's loader reference contains `fragment`.
    pub fn matches(&self, fragment: &str) -> bool {
        self.loader().contains(fragment)
    }

    /// Deep-merge `patch` over the static fields.
    ///
    /// The descriptor is left untouched when the result would be invalid.
    pub(crate) fn merge_patch(&mut self, patch: Value) -> Result<()> {
        let Value::Object(patch) = patch else {
            return Err(PackrigError::InvalidDescriptor {
                kind: "loader",
                message: format!("fields must be an object, got {}", patch),
            });
        };

        let mut fields = self.fields.clone();
        for (key, value) in patch {
            match fields.get_mut(&key) {
                Some(existing) => deep_merge_into(existing, value),
                None => {
                    fields.insert(key, value);
                }
            }
        }
        validate(&fields)?;
        self.fields = fields;
        Ok(())
    }

    /// Produce the concrete rule, calling the deferred evaluator if any.
    ///
    /// # Errors
    ///
    /// Returns `Realization` if the evaluator fails, yields a non-object, or
    /// overwrites `test`/`loader` with something invalid.
    pub fn realize(&self) -> Result<Value> {
        let mut rule = Value::Object(self.fields.clone());

        if let Some(evaluator) = &self.deferred {
            let fragment = evaluator().map_err(|source| self.realization_error(source))?;
            if !fragment.is_object() {
                return Err(self.realization_error(anyhow::anyhow!(
                    "deferred options must be an object, got {}",
                    fragment
                )));
            }
            deep_merge_into(&mut rule, fragment);
            if let Some(fields) = rule.as_object() {
                validate(fields).map_err(|e| self.realization_error(anyhow::Error::new(e)))?;
            }
        }

        Ok(rule)
    }

    fn realization_error(&self, source: anyhow::Error) -> PackrigError {
        PackrigError::Realization {
            identity: self.loader().to_string(),
            source,
        }
    }
}

fn validate(fields: &Map<String, Value>) -> Result<()> {
    let loader = fields.get(LOADER_KEY).and_then(Value::as_str);
    if loader.is_none_or(str::is_empty) {
        return Err(PackrigError::InvalidDescriptor {
            kind: "loader",
            message: "missing loader reference".to_string(),
        });
    }

    let Some(test) = fields.get(TEST_KEY).and_then(Value::as_str) else {
        return Err(PackrigError::InvalidDescriptor {
            kind: "loader",
            message: "missing match pattern".to_string(),
        });
    };
    Regex::new(test).map_err(|e| PackrigError::InvalidDescriptor {
        kind: "loader",
        message: format!("invalid match pattern '{}': {}", test, e),
    })?;

    Ok(())
}

impl PartialEq for LoaderDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let same_deferred = match (&self.deferred, &other.deferred) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_deferred && self.fields == other.fields
    }
}

impl fmt::Debug for LoaderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderDescriptor")
            .field("fields", &self.fields)
            .field("deferred", &self.deferred.is_some())
            .finish()
    }
}
