// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Right-biased deep merge for [`serde_json::Value`] trees.
//!
//! [`merge`] combines two JSON values: objects merge key by key, recursing
//! into keys present on both sides; every other pairing resolves to the
//! overlay value. Arrays are deliberately *not* merged element-wise — a
//! later array replaces an earlier one wholesale. An explicit `null` on the
//! overlay side replaces the base value like any other scalar.
//!
//! Inputs are taken by value; nothing is mutated through a shared reference.

use serde_json::{Map, Value};

/// Merge `overlay` onto `base`, overlay winning on conflicts.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let merged = wf_merge::merge(
///     json!({"a": {"x": 1, "y": 2}, "b": [1, 2]}),
///     json!({"a": {"y": 3}, "b": [9]}),
/// );
/// assert_eq!(merged, json!({"a": {"x": 1, "y": 3}, "b": [9]}));
/// ```
#[must_use]
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            Value::Object(merge_objects(base, overlay))
        }
        (_, overlay) => overlay,
    }
}

/// Merge two JSON object maps key by key, recursing via [`merge`].
#[must_use]
pub fn merge_objects(
    mut base: Map<String, Value>,
    overlay: Map<String, Value>,
) -> Map<String, Value> {
    for (key, value) in overlay {
        let merged = match base.remove(&key) {
            Some(existing) => merge(existing, value),
            None => value,
        };
        base.insert(key, merged);
    }
    base
}

/// Fold a sequence of values left to right with [`merge`].
///
/// An empty sequence yields `Value::Null`, which any later value replaces.
#[must_use]
pub fn merge_all<I>(values: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().fold(Value::Null, merge)
}
