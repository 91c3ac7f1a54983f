// SPDX-License-Identifier: MIT OR Apache-2.0
//! The closed set of error kinds and their per-kind defaults.

/// Machine-level classification of an [`ApiError`](crate::ApiError).
///
/// Twelve kinds map one-to-one onto the wire-name table a transport layer
/// dispatches on, [`Aggregated`](Self::Aggregated) composes several errors
/// into one, and [`Other`](Self::Other) is the unnamed catch-all used when a
/// received payload carries a name outside the table (or none the caller
/// cares to classify). Each kind fixes a default HTTP-style status code and
/// a default human-readable message; both can be supplied explicitly at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request lacks valid authentication (401).
    NotAuthorized,
    /// Payment is required before the request can proceed (402).
    PaymentRequired,
    /// The caller is authenticated but not allowed (403).
    Forbidden,
    /// The addressed resource does not exist (404).
    NotFound,
    /// The resource already exists; wire name `already-exists` (409).
    Conflict,
    /// The HTTP method is not supported by the resource (405).
    MethodNotAllowed,
    /// The request is malformed or fails validation (400).
    BadRequest,
    /// The caller exceeded a rate limit (429).
    TooManyRequests,
    /// The request body exceeds the accepted size (413).
    PayloadTooLarge,
    /// Unexpected server-side failure (500).
    Internal,
    /// The requested functionality does not exist yet (501).
    NotImplemented,
    /// The service is temporarily unable to respond (503).
    ServiceUnavailable,
    /// An ordered collection of child errors reported as one (400).
    Aggregated,
    /// Unnamed catch-all kind with no fixed wire name (500).
    Other,
}

impl ErrorKind {
    /// Every kind, for exhaustive iteration in tests and tooling.
    pub const ALL: &'static [ErrorKind] = &[
        Self::NotAuthorized,
        Self::PaymentRequired,
        Self::Forbidden,
        Self::NotFound,
        Self::Conflict,
        Self::MethodNotAllowed,
        Self::BadRequest,
        Self::TooManyRequests,
        Self::PayloadTooLarge,
        Self::Internal,
        Self::NotImplemented,
        Self::ServiceUnavailable,
        Self::Aggregated,
        Self::Other,
    ];

    /// Stable wire name used as the JSON discriminant.
    ///
    /// [`Other`](Self::Other) has no fixed wire name and returns the empty
    /// string; whatever name the instance carries (possibly none) is used
    /// instead.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::NotAuthorized => "not-authorized",
            Self::PaymentRequired => "payment-required",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not-found",
            Self::Conflict => "already-exists",
            Self::MethodNotAllowed => "method-not-allowed",
            Self::BadRequest => "bad-request",
            Self::TooManyRequests => "too-many-requests",
            Self::PayloadTooLarge => "payload-too-large",
            Self::Internal => "internal-error",
            Self::NotImplemented => "not-implemented",
            Self::ServiceUnavailable => "service-unavailable",
            Self::Aggregated => "aggregated",
            Self::Other => "",
        }
    }

    /// Default HTTP-style status code for the kind.
    pub fn default_status(self) -> u16 {
        match self {
            Self::NotAuthorized => 401,
            Self::PaymentRequired => 402,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::MethodNotAllowed => 405,
            Self::BadRequest | Self::Aggregated => 400,
            Self::TooManyRequests => 429,
            Self::PayloadTooLarge => 413,
            Self::Internal | Self::Other => 500,
            Self::NotImplemented => 501,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Default human-readable message for the kind.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::NotAuthorized => "The request requires authentication.",
            Self::PaymentRequired => "Payment is required to complete this request.",
            Self::Forbidden => "Access to this resource is forbidden.",
            Self::NotFound => "The requested resource was not found.",
            Self::Conflict => "The resource already exists.",
            Self::MethodNotAllowed => "The method is not allowed for this resource.",
            Self::BadRequest => "The request could not be processed.",
            Self::TooManyRequests => "Too many requests have been issued.",
            Self::PayloadTooLarge => "The request payload is too large.",
            Self::Internal => "An internal error occurred.",
            Self::NotImplemented => "The requested functionality is not implemented.",
            Self::ServiceUnavailable => "The service is temporarily unavailable.",
            Self::Aggregated => "Multiple errors occurred.",
            Self::Other => "An unknown error occurred.",
        }
    }

    /// Whether a caller-supplied `name` option replaces the fixed wire name.
    ///
    /// The three authentication-adjacent kinds keep their identity no matter
    /// what the caller passes; every other kind honors an override.
    pub fn allows_name_override(self) -> bool {
        !matches!(
            self,
            Self::NotAuthorized | Self::PaymentRequired | Self::Forbidden
        )
    }

    /// Look up a kind by its wire name.
    ///
    /// Returns `None` for anything outside the fixed table — the caller
    /// decides whether that degrades to [`Other`](Self::Other) or fails.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "not-authorized" => Some(Self::NotAuthorized),
            "payment-required" => Some(Self::PaymentRequired),
            "forbidden" => Some(Self::Forbidden),
            "not-found" => Some(Self::NotFound),
            "already-exists" => Some(Self::Conflict),
            "method-not-allowed" => Some(Self::MethodNotAllowed),
            "bad-request" => Some(Self::BadRequest),
            "too-many-requests" => Some(Self::TooManyRequests),
            "payload-too-large" => Some(Self::PayloadTooLarge),
            "internal-error" => Some(Self::Internal),
            "not-implemented" => Some(Self::NotImplemented),
            "service-unavailable" => Some(Self::ServiceUnavailable),
            "aggregated" => Some(Self::Aggregated),
            _ => None,
        }
    }

    /// Whether the kind's default status falls in the 4xx family.
    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.default_status())
    }

    /// Whether the kind's default status falls in the 5xx family.
    pub fn is_server_error(self) -> bool {
        (500..600).contains(&self.default_status())
    }
}
