// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed API-facing error taxonomy with a wire-safe JSON shape.
//!
//! Every error carries an [`ErrorKind`] (a fixed taxonomy of HTTP-style
//! failure kinds), a status code, a human-readable message, and optional
//! structured context — the entity involved, a key path into the offending
//! payload, an opaque origin marker, and the underlying error it wraps.
//! [`ApiError::to_wire`] produces the JSON shape a transport layer writes
//! into a response body, and [`parse`] rebuilds the same typed error on the
//! receiving side from that body plus the HTTP status it arrived with.
//!
//! # Raising
//!
//! ```
//! use wf_error::ApiError;
//!
//! let err = ApiError::not_found("user 42 does not exist")
//!     .with_entity("user")
//!     .with_key_path("params.userId");
//!
//! assert_eq!(err.status_code(), 404);
//! assert_eq!(
//!     err.to_json(&Default::default()),
//!     serde_json::json!({
//!         "name": "not-found",
//!         "message": "user 42 does not exist",
//!         "entity": "user",
//!         "keyPath": "params.userId",
//!     }),
//! );
//! ```
//!
//! # Receiving
//!
//! ```
//! use wf_error::{parse, ErrorKind};
//!
//! let body = serde_json::json!({"name": "too-many-requests", "message": "slow down"});
//! let err = parse(&body, 429, None);
//! assert_eq!(err.kind(), ErrorKind::TooManyRequests);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod kind;
mod options;
mod parse;
mod wire;

pub use error::ApiError;
pub use kind::ErrorKind;
pub use options::{ErrorOptions, KeyPath};
pub use parse::{parse, try_parse, ParseConfig, ParseError, UnknownNames};
pub use wire::{kebab_name, WireConfig, WireError};

// Re-exported so callers can build and inspect structured stacks without a
// direct wf-stack dependency.
pub use wf_stack::{StackFrame, StackTrace};

/// Result type alias for fallible operations that surface an [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;
