//! Deferred values and enable predicates.
//!
//! Descriptor options, plugin arguments and plugin enable predicates may be
//! computed at realization time instead of registration time. [`Lazy`] holds
//! either a static value or an evaluator; [`Enablement`] decides whether a
//! plugin takes part in a build.
//!
//! Evaluators are never called outside of [`Lazy::resolve`] and
//! [`Enablement::evaluate`], and their results are never cached: every
//! realization calls them again.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A zero-argument function producing a value at realization time.
pub type Evaluator<T> = Arc<dyn Fn() -> anyhow::Result<T> + Send + Sync>;

/// A value that is either known at registration time or computed on demand.
pub enum Lazy<T> {
    /// Value fixed when the descriptor was registered.
    Static(T),
    /// Value produced by calling the evaluator during realization.
    Deferred(Evaluator<T>),
}

impl<T: Clone> Lazy<T> {
    /// Wrap a closure as a deferred value.
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Lazy::Deferred(Arc::new(f))
    }

    /// Produce the value, calling the evaluator if deferred.
    pub fn resolve(&self) -> anyhow::Result<T> {
        match self {
            Lazy::Static(value) => Ok(value.clone()),
            Lazy::Deferred(evaluator) => evaluator(),
        }
    }

    /// Whether the value is computed at realization time.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Lazy::Deferred(_))
    }

    /// The static value, if there is one.
    pub fn as_static(&self) -> Option<&T> {
        match self {
            Lazy::Static(value) => Some(value),
            Lazy::Deferred(_) => None,
        }
    }
}

impl<T> Clone for Lazy<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Lazy::Static(value) => Lazy::Static(value.clone()),
            Lazy::Deferred(evaluator) => Lazy::Deferred(Arc::clone(evaluator)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lazy::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Lazy::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<T> From<T> for Lazy<T> {
    fn from(value: T) -> Self {
        Lazy::Static(value)
    }
}

/// Whether a plugin descriptor is part of the realized output.
#[derive(Clone, Default)]
pub enum Enablement {
    /// Always enabled. Same as having no predicate.
    #[default]
    Always,
    /// Never enabled.
    Never,
    /// Enabled when the predicate returns true at realization time.
    When(Evaluator<bool>),
}

impl Enablement {
    /// Enable when `predicate` holds at realization time.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn() -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Enablement::When(Arc::new(predicate))
    }

    /// Enable when the structured value produced by `predicate` is truthy.
    ///
    /// See [`truthy`] for the coercion rules.
    pub fn when_truthy<F>(predicate: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Enablement::When(Arc::new(move || predicate().map(|value| truthy(&value))))
    }

    /// Decide whether the descriptor is enabled right now.
    pub fn evaluate(&self) -> anyhow::Result<bool> {
        match self {
            Enablement::Always => Ok(true),
            Enablement::Never => Ok(false),
            Enablement::When(predicate) => predicate(),
        }
    }
}

impl From<bool> for Enablement {
    fn from(enabled: bool) -> Self {
        if enabled {
            Enablement::Always
        } else {
            Enablement::Never
        }
    }
}

impl fmt::Debug for Enablement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Enablement::Always => f.write_str("Always"),
            Enablement::Never => f.write_str("Never"),
            Enablement::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Coerce a structured value to a boolean.
///
/// `null`, `false`, `0`, `NaN`-like non-finite numbers and the empty string
/// are false. Everything else, including empty arrays and objects, is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
