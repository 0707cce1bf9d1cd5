//! Deep merge algorithm for configuration values.
//!
//! Every options setter, loader update and the final composition step fold
//! fragments together with [`deep_merge`]. Build target files are layered with
//! the same function.
//!
//! # Merge Rules
//!
//! - Objects are merged recursively (key-wise union)
//! - Arrays are replaced entirely (no concatenation, no de-duplication)
//! - Scalars in overlay replace whatever is in base, `null` included
//! - A key present on one side only is taken unchanged
//!
//! Array replacement is easy to trip over: `resolve.extensions` set twice keeps
//! only the second list. Callers that want to extend a list must read the
//! current one and pass the combined list.

use serde_json::Value;

/// Deep merge two JSON values.
///
/// Later values override earlier values at the point of conflict.
/// Objects are merged recursively. Arrays are replaced entirely.
///
/// # Arguments
///
/// * `base` - The base value
/// * `overlay` - The overlay value (takes precedence)
///
/// # Returns
///
/// A new Value with merged contents
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                let merged = match base_map.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }

            Value::Object(result)
        }

        // Overlay is not an object, or base is not an object: overlay wins
        (_, overlay) => overlay.clone(),
    }
}

/// Merge `overlay` into `base` in place.
///
/// Same rules as [`deep_merge`], without cloning the untouched parts of
/// `base`.
pub fn deep_merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge_into(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge multiple values in order (later overrides earlier).
///
/// # Arguments
///
/// * `values` - Slice of values in merge order (first is base, last has highest priority)
///
/// # Returns
///
/// A single merged Value; an empty object when `values` is empty
pub fn merge_configs(values: &[Value]) -> Value {
    values
        .iter()
        .fold(Value::Object(Default::default()), |acc, value| {
            deep_merge(&acc, value)
        })
}
