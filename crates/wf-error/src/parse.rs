// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reconstruction of typed errors from received wire payloads.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::ApiError;
use crate::kind::ErrorKind;
use crate::options::ErrorOptions;

/// Policy for `name` values outside the fixed wire table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownNames {
    /// Degrade to the unnamed kind, preserving the received name.
    #[default]
    Coerce,
    /// Fail with [`ParseError::UnknownName`].
    Reject,
}

/// Settings for [`try_parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// How to treat unrecognized wire names, at any depth.
    pub unknown_names: UnknownNames,
}

/// Failure modes of strict reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The payload carried a `name` outside the wire-name table.
    #[error("unrecognized wire error name: {name}")]
    UnknownName {
        /// The offending name, exactly as received.
        name: String,
    },
}

/// Reconstruct a typed [`ApiError`] from an untrusted payload plus the HTTP
/// status it arrived with. Lenient: never fails.
///
/// The payload's `name` selects the kind (`bad-request` when absent; an
/// unrecognized name degrades to the unnamed kind with the received name
/// preserved). The transport `status_code` and `origin` win over anything
/// the payload claims. An `errors` array is reconstructed recursively with
/// the same status and origin. Non-object payloads behave as empty objects.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wf_error::{parse, ErrorKind};
///
/// let err = parse(
///     &json!({"name": "not-found", "message": "user 42 does not exist"}),
///     404,
///     Some("gateway".into()),
/// );
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.origin(), Some(&json!("gateway")));
/// ```
#[must_use]
pub fn parse(data: &Value, status_code: u16, origin: Option<Value>) -> ApiError {
    reconstruct(data, status_code, origin.as_ref()).0
}

/// Reconstruct with an explicit policy; see [`parse`] for the mechanics.
///
/// With [`UnknownNames::Reject`] an unrecognized name anywhere in the
/// payload — including inside a child of an aggregated error — fails the
/// whole parse.
pub fn try_parse(
    data: &Value,
    status_code: u16,
    origin: Option<Value>,
    config: &ParseConfig,
) -> Result<ApiError, ParseError> {
    let (error, unknown) = reconstruct(data, status_code, origin.as_ref());
    match (config.unknown_names, unknown) {
        (UnknownNames::Reject, Some(name)) => Err(ParseError::UnknownName { name }),
        _ => Ok(error),
    }
}

/// Lenient reconstruction core. Returns the error plus the first
/// unrecognized wire name encountered, for the strict entry point.
fn reconstruct(
    data: &Value,
    status_code: u16,
    origin: Option<&Value>,
) -> (ApiError, Option<String>) {
    let mut map = match data {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    // The kind is selected from the payload's own name, before the overlay
    // touches anything.
    let mut unknown = None;
    let kind = match map.get("name").and_then(Value::as_str) {
        None => ErrorKind::BadRequest,
        Some(name) => ErrorKind::from_wire_name(name).unwrap_or_else(|| {
            unknown = Some(name.to_string());
            ErrorKind::Other
        }),
    };

    // Children are reconstructed with the same transport facts.
    let mut children = Vec::new();
    if let Some(Value::Array(raw_children)) = map.remove("errors") {
        for raw in &raw_children {
            let (child, child_unknown) = reconstruct(raw, status_code, origin);
            if unknown.is_none() {
                unknown = child_unknown;
            }
            children.push(child);
        }
    }

    // Transport-level facts win over whatever the payload claims.
    let mut overlay = Map::new();
    overlay.insert("statusCode".to_string(), Value::from(status_code));
    if let Some(origin) = origin {
        overlay.insert("origin".to_string(), origin.clone());
    }
    let merged = wf_merge::merge(Value::Object(map), Value::Object(overlay));

    let mut options = ErrorOptions::from_value(merged);
    options.errors = children;
    (ApiError::from_options(kind, options), unknown)
}
