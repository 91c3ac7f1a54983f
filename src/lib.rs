// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]

//! wirefault
//!
//! Facade over the workspace crates: a typed API-facing error model
//! ([`wf_error`]), the deep-merge utility its reconstruction path uses
//! ([`wf_merge`]), and structured stack traces ([`wf_stack`]).
//!
//! Most callers only need the error model; the utilities are re-exported for
//! the transports and clients that want to work with the same primitives.

pub use wf_error::{
    kebab_name, parse, try_parse, ApiError, ErrorKind, ErrorOptions, KeyPath, ParseConfig,
    ParseError, Result, StackFrame, StackTrace, UnknownNames, WireConfig, WireError,
};

pub use wf_merge as merge;
pub use wf_stack as stack;
