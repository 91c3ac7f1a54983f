// SPDX-License-Identifier: MIT OR Apache-2.0
//! Construction options and key-path normalization.

use std::fmt;

use serde_json::{Map, Value};
use wf_stack::StackTrace;

use crate::error::ApiError;

/// Ordered path into a structured payload, e.g. the field a validation
/// failure points at.
///
/// Accepted as a dot-delimited string (`"params.userId"`) or an explicit
/// segment list; rendered back as the dot-delimited form on the wire. An
/// empty path is treated as "not provided" everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the path holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lenient conversion from a JSON value: a dot-delimited string or an
    /// array of strings. Anything else yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(path) => Some(Self::from(path.as_str())),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self(path.split('.').map(str::to_string).collect())
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl FromIterator<String> for KeyPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Everything an [`ApiError`] can be constructed from, beyond its kind.
///
/// All recognized fields are optional; whatever a caller supplies under an
/// unrecognized key is preserved verbatim in [`extra`](Self::extra) and never
/// serialized automatically. This is the explicit-destructuring rendering of
/// a loose options object: recognized keys are pulled into typed fields once,
/// the residue stays a plain JSON map.
#[derive(Debug, Default)]
pub struct ErrorOptions {
    /// Human-readable description; the kind's default applies when absent.
    pub message: Option<String>,
    /// Wire-name override, honored only by kinds that allow it.
    pub name: Option<String>,
    /// HTTP-style status override; the kind's default applies when absent.
    pub status_code: Option<u16>,
    /// Subject of the error, e.g. a resource type name.
    pub entity: Option<String>,
    /// Path into the payload the error refers to.
    pub key_path: Option<KeyPath>,
    /// Opaque marker of where the error was produced.
    pub origin: Option<Value>,
    /// The error this one wraps; forms a single-parent chain.
    pub underlying: Option<Box<ApiError>>,
    /// Pre-built structured stack; short-circuits live capture.
    pub stack: Option<StackTrace>,
    /// Child errors, meaningful for the aggregated kind.
    pub errors: Vec<ApiError>,
    /// Residual bag of unrecognized keys, kept verbatim.
    pub extra: Map<String, Value>,
}

impl ErrorOptions {
    /// Destructure a JSON object into recognized fields plus the residue.
    ///
    /// Recognized keys are `message`, `name`, `entity`, `statusCode`,
    /// `keyPath`, `origin`, and `stack`; a wrong-typed value under one of
    /// those keys is dropped rather than kept. Non-object input yields the
    /// default (all-absent) options. Child `errors` payloads are not handled
    /// here — reconstruction owns their recursion — so an `errors` key left
    /// in the input lands in [`extra`](Self::extra) like any other residue.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        Self {
            message: take_string(&mut map, "message"),
            name: take_string(&mut map, "name"),
            entity: take_string(&mut map, "entity"),
            status_code: map
                .remove("statusCode")
                .and_then(|v| v.as_u64())
                .and_then(|v| u16::try_from(v).ok()),
            key_path: map.remove("keyPath").and_then(|v| KeyPath::from_value(&v)),
            origin: map.remove("origin"),
            underlying: None,
            stack: map
                .remove("stack")
                .and_then(|v| serde_json::from_value(v).ok()),
            errors: Vec::new(),
            extra: map,
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}
