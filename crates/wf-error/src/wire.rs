// SPDX-License-Identifier: MIT OR Apache-2.0
//! The wire-safe JSON shape and serialization into it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wf_stack::StackTrace;

use crate::error::ApiError;
use crate::kind::ErrorKind;

/// Serialization settings for [`ApiError::to_wire`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireConfig {
    /// Include the structured stack of the root cause in the payload.
    ///
    /// Off by default: stacks describe process internals and belong in
    /// trusted channels only.
    pub include_stack: bool,
}

impl WireConfig {
    /// Config with the stack included.
    #[must_use]
    pub fn with_stack() -> Self {
        Self {
            include_stack: true,
        }
    }
}

/// Wire-safe snapshot of an [`ApiError`].
///
/// Exactly the fields a client may see: `name`, `message`, `entity`,
/// `keyPath`, optionally `stack`, and `errors` for the aggregated kind.
/// Absent optionals are omitted, never rendered as `null`. Origin, the
/// underlying chain, and the residual options bag are local-process context
/// and have no wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WireError {
    /// Kebab-case wire name, the receiving side's discriminant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Subject of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Dot-delimited path into the payload.
    #[serde(rename = "keyPath", skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
    /// Structured stack of the root cause, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackTrace>,
    /// Child payloads, present only for the aggregated kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<WireError>>,
}

impl ApiError {
    /// Produce the wire-safe snapshot. Never fails.
    ///
    /// Recurses through the children of an aggregated error in insertion
    /// order; the same config applies at every depth.
    #[must_use]
    pub fn to_wire(&self, config: &WireConfig) -> WireError {
        let name = kebab_name(self.name());
        WireError {
            name: (!name.is_empty()).then_some(name),
            message: self.message().to_string(),
            entity: self.entity().map(str::to_string),
            key_path: {
                let key_path = self.key_path();
                (!key_path.is_empty()).then(|| key_path.to_string())
            },
            stack: config.include_stack.then(|| self.stacked().clone()),
            errors: (self.kind() == ErrorKind::Aggregated).then(|| {
                self.errors()
                    .iter()
                    .map(|child| child.to_wire(config))
                    .collect()
            }),
        }
    }

    /// The wire snapshot as a JSON value. Never fails.
    #[must_use]
    pub fn to_json(&self, config: &WireConfig) -> Value {
        serde_json::to_value(self.to_wire(config)).unwrap_or(Value::Null)
    }
}

impl From<&ApiError> for WireError {
    fn from(error: &ApiError) -> Self {
        error.to_wire(&WireConfig::default())
    }
}

/// Normalize an identifier to its kebab-case wire form.
///
/// Splits before each ASCII uppercase letter and lower-cases it, so an
/// internal `NotFound` becomes `not-found`. Idempotent on names that are
/// already kebab-case.
#[must_use]
pub fn kebab_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
