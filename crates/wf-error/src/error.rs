// SPDX-License-Identifier: MIT OR Apache-2.0
//! The concrete error model.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use serde_json::{Map, Value};
use wf_stack::StackTrace;

use crate::kind::ErrorKind;
use crate::options::{ErrorOptions, KeyPath};
use crate::wire::kebab_name;

/// Where an error's stack trace comes from.
///
/// Construction captures a point-in-time call-site trace through the host
/// mechanism unless the caller supplied a pre-built structured trace (the
/// receive path does, so a reconstructed error keeps the sender's frames
/// instead of its own deserialization site).
#[derive(Debug, Clone)]
enum TraceSource {
    Supplied(StackTrace),
    Captured(Arc<Backtrace>),
}

/// A typed, API-facing error.
///
/// One struct covers the whole taxonomy: the [`ErrorKind`] tag selects the
/// per-kind defaults (wire name, status code, message) and the rest of the
/// fields are shared. Instances are immutable after construction except for
/// the child collection of the aggregated kind.
///
/// # Examples
///
/// ```
/// use wf_error::{ApiError, ErrorKind};
///
/// let err = ApiError::not_found("user 42 does not exist")
///     .with_entity("user")
///     .with_key_path("params.userId");
///
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.key_path().to_string(), "params.userId");
/// ```
pub struct ApiError {
    kind: ErrorKind,
    /// Wire name; empty for the unnamed kind when no name was supplied.
    name: String,
    message: String,
    status_code: u16,
    entity: Option<String>,
    key_path: KeyPath,
    origin: Option<Value>,
    underlying: Option<Box<ApiError>>,
    extra: Map<String, Value>,
    children: Vec<ApiError>,
    trace: TraceSource,
    stacked: OnceLock<StackTrace>,
}

impl ApiError {
    /// Construct from a kind and the full option set.
    ///
    /// Every construction path funnels through here: message and status fall
    /// back to the kind's defaults, a `name` override is honored only where
    /// the kind allows it, and the aggregated kind initializes its children
    /// from the wrapped error's collection when re-wrapping an aggregate,
    /// else from `options.errors`.
    #[must_use]
    pub fn from_options(kind: ErrorKind, options: ErrorOptions) -> Self {
        let ErrorOptions {
            message,
            name,
            status_code,
            entity,
            key_path,
            origin,
            underlying,
            stack,
            errors,
            extra,
        } = options;

        let name = match name {
            Some(name) if kind.allows_name_override() => name,
            _ => kind.wire_name().to_string(),
        };
        let children = if kind == ErrorKind::Aggregated {
            match underlying.as_deref() {
                Some(wrapped) if wrapped.kind == ErrorKind::Aggregated => {
                    wrapped.children.clone()
                }
                _ => errors,
            }
        } else {
            errors
        };
        let trace = match stack {
            Some(stack) => TraceSource::Supplied(stack),
            None => TraceSource::Captured(Arc::new(Backtrace::capture())),
        };

        Self {
            kind,
            name,
            message: message.unwrap_or_else(|| kind.default_message().to_string()),
            status_code: status_code.unwrap_or_else(|| kind.default_status()),
            entity,
            key_path: key_path.unwrap_or_default(),
            origin,
            underlying,
            extra,
            children,
            trace,
            stacked: OnceLock::new(),
        }
    }

    /// Construct with an explicit message; everything else defaulted.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::from_options(
            kind,
            ErrorOptions {
                message: Some(message.into()),
                ..ErrorOptions::default()
            },
        )
    }

    // -- Named constructors, one per wire kind ---------------------------

    /// 401 `not-authorized`.
    #[must_use]
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, message)
    }

    /// 402 `payment-required`.
    #[must_use]
    pub fn payment_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PaymentRequired, message)
    }

    /// 403 `forbidden`.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// 404 `not-found`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 409 `already-exists`.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// 405 `method-not-allowed`.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, message)
    }

    /// 400 `bad-request`.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 429 `too-many-requests`.
    #[must_use]
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    /// 413 `payload-too-large`.
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, message)
    }

    /// 500 `internal-error`.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// 501 `not-implemented`.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// 503 `service-unavailable`.
    #[must_use]
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// 400 `aggregated`, holding the given children in order.
    #[must_use]
    pub fn aggregate<I>(errors: I) -> Self
    where
        I: IntoIterator<Item = ApiError>,
    {
        Self::from_options(
            ErrorKind::Aggregated,
            ErrorOptions {
                errors: errors.into_iter().collect(),
                ..ErrorOptions::default()
            },
        )
    }

    // -- Builders --------------------------------------------------------

    /// Replace the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Override the wire name; a no-op for kinds that fix theirs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        if self.kind.allows_name_override() {
            self.name = name.into();
        }
        self
    }

    /// Override the status code.
    #[must_use]
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Set the subject of the error.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the key path; accepts a dot-delimited string or segments.
    #[must_use]
    pub fn with_key_path(mut self, key_path: impl Into<KeyPath>) -> Self {
        self.key_path = key_path.into();
        self
    }

    /// Mark where the error was produced.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<Value>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Wrap another error, extending the `underlying` chain by one link.
    #[must_use]
    pub fn with_underlying(mut self, underlying: ApiError) -> Self {
        self.underlying = Some(Box::new(underlying));
        self
    }

    /// Supply a pre-built structured stack, discarding the live capture.
    #[must_use]
    pub fn with_stack(mut self, stack: StackTrace) -> Self {
        self.trace = TraceSource::Supplied(stack);
        self.stacked = OnceLock::new();
        self
    }

    /// Attach a key-value pair to the residual options bag.
    ///
    /// The value is converted via [`serde_json::to_value`]; if conversion
    /// fails, the entry is silently skipped. The bag is local-process
    /// context and never serializes to the wire.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.extra.insert(key.into(), value);
        }
        self
    }

    // -- Accessors -------------------------------------------------------

    /// The kind tag.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Wire name; empty when the unnamed kind carries none.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP-style status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Subject of the error, when provided.
    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Path into the payload; empty means "not provided".
    #[must_use]
    pub fn key_path(&self) -> &KeyPath {
        &self.key_path
    }

    /// Opaque producer marker, when provided.
    #[must_use]
    pub fn origin(&self) -> Option<&Value> {
        self.origin.as_ref()
    }

    /// The error this one wraps, when any.
    #[must_use]
    pub fn underlying(&self) -> Option<&ApiError> {
        self.underlying.as_deref()
    }

    /// The residual options bag.
    #[must_use]
    pub fn options(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Single entry of the residual options bag.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Whether the status code falls in the 4xx family.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Whether the status code falls in the 5xx family.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// The root cause: the first ancestor along the `underlying` chain that
    /// wraps nothing further (or `self` when it wraps nothing).
    #[must_use]
    pub fn actual(&self) -> &ApiError {
        let mut current = self;
        while let Some(wrapped) = current.underlying.as_deref() {
            current = wrapped;
        }
        current
    }

    /// Structured stack of the root cause.
    ///
    /// Always derived from [`actual`](Self::actual), never an intermediate
    /// wrapper: either the trace the root was constructed with, or its live
    /// capture parsed into frames on first access and memoized.
    #[must_use]
    pub fn stacked(&self) -> &StackTrace {
        let root = self.actual();
        match &root.trace {
            TraceSource::Supplied(stack) => stack,
            TraceSource::Captured(backtrace) => root
                .stacked
                .get_or_init(|| wf_stack::parse(&backtrace.to_string())),
        }
    }

    // -- Aggregated children ---------------------------------------------

    /// Child errors, in insertion order. Empty for non-aggregated kinds.
    #[must_use]
    pub fn errors(&self) -> &[ApiError] {
        &self.children
    }

    /// Append a child error.
    pub fn add(&mut self, error: ApiError) {
        self.children.push(error);
    }

    /// Append several child errors, preserving their order.
    pub fn add_all<I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = ApiError>,
    {
        self.children.extend(errors);
    }

    /// Replace the whole child collection.
    pub fn set_errors(&mut self, errors: Vec<ApiError>) {
        self.children = errors;
    }
}

impl From<ErrorKind> for ApiError {
    /// An error of the given kind with every default in place.
    fn from(kind: ErrorKind) -> Self {
        Self::from_options(kind, ErrorOptions::default())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "[{}] {}", kebab_name(&self.name), self.message)
        }
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ApiError");
        d.field("kind", &self.kind);
        if !self.name.is_empty() {
            d.field("name", &self.name);
        }
        d.field("message", &self.message);
        d.field("status_code", &self.status_code);
        if let Some(entity) = &self.entity {
            d.field("entity", entity);
        }
        if !self.key_path.is_empty() {
            d.field("key_path", &self.key_path.to_string());
        }
        if let Some(origin) = &self.origin {
            d.field("origin", origin);
        }
        if !self.extra.is_empty() {
            d.field("options", &self.extra);
        }
        if !self.children.is_empty() {
            d.field("errors", &self.children);
        }
        if let Some(underlying) = &self.underlying {
            d.field("underlying", underlying);
        }
        d.finish()
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.underlying
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl Clone for ApiError {
    fn clone(&self) -> Self {
        // Memo cell contents carry over when already computed; a captured
        // backtrace is shared between the clones.
        let stacked = match self.stacked.get() {
            Some(stack) => OnceLock::from(stack.clone()),
            None => OnceLock::new(),
        };
        Self {
            kind: self.kind,
            name: self.name.clone(),
            message: self.message.clone(),
            status_code: self.status_code,
            entity: self.entity.clone(),
            key_path: self.key_path.clone(),
            origin: self.origin.clone(),
            underlying: self.underlying.clone(),
            extra: self.extra.clone(),
            children: self.children.clone(),
            trace: self.trace.clone(),
            stacked,
        }
    }
}
