// SPDX-License-Identifier: MIT OR Apache-2.0
//! Send-then-receive round trips through the wire shape.
//!
//! Serializes errors the way a transport layer would and rehydrates them the
//! way a client would, checking that the typed result is indistinguishable
//! from the original where the wire shape carries the field.

use serde_json::json;
use wirefault::{
    parse, try_parse, ApiError, ErrorKind, ParseConfig, ParseError, StackFrame, StackTrace,
    UnknownNames, WireConfig,
};

fn sample_stack() -> StackTrace {
    [
        StackFrame::new("service::handlers::lookup").with_location("/srv/handlers.rs", 41),
        StackFrame::new("service::main"),
    ]
    .into_iter()
    .collect()
}

/// A representative instance of the given kind, with every wire field set.
fn specimen(kind: ErrorKind) -> ApiError {
    let mut err = ApiError::new(kind, format!("{} happened", kind.wire_name()))
        .with_entity("account")
        .with_key_path("payload.field")
        .with_stack(sample_stack());
    if kind == ErrorKind::Aggregated {
        err.add(ApiError::not_found("child gone"));
    }
    err
}

// ===========================================================================
// 1. Round trip for every named kind
// ===========================================================================

#[test]
fn every_named_kind_roundtrips() {
    for kind in ErrorKind::ALL.iter().copied() {
        if kind == ErrorKind::Other {
            continue;
        }
        let original = specimen(kind);
        let body = original.to_json(&WireConfig::with_stack());
        let back = parse(&body, original.status_code(), Some(json!("gateway")));

        assert_eq!(back.kind(), kind, "kind survives for {kind:?}");
        assert_eq!(back.message(), original.message());
        assert_eq!(back.entity(), original.entity());
        assert_eq!(back.key_path(), original.key_path());
        assert_eq!(back.status_code(), original.status_code());
        assert_eq!(back.stacked(), &sample_stack(), "stack survives for {kind:?}");
    }
}

#[test]
fn reconstructed_error_carries_the_receivers_origin() {
    let body = ApiError::forbidden("no").to_json(&WireConfig::default());
    let back = parse(&body, 403, Some(json!({"service": "billing"})));
    assert_eq!(back.origin(), Some(&json!({"service": "billing"})));
}

#[test]
fn custom_name_on_an_open_kind_survives() {
    let original = ApiError::not_found("gone").with_name("user-missing");
    let body = original.to_json(&WireConfig::default());
    // `user-missing` is not in the table, so the receiver sees the unnamed
    // kind but keeps the name verbatim.
    let back = parse(&body, 404, None);
    assert_eq!(back.kind(), ErrorKind::Other);
    assert_eq!(back.name(), "user-missing");
    assert_eq!(back.status_code(), 404);
}

// ===========================================================================
// 2. Wire-shape details
// ===========================================================================

#[test]
fn key_path_roundtrips_through_the_dot_form() {
    let original = ApiError::bad_request("invalid").with_key_path("a.b.c");
    assert_eq!(original.key_path().segments(), ["a", "b", "c"]);

    let body = original.to_json(&WireConfig::default());
    assert_eq!(body["keyPath"], json!("a.b.c"));

    let back = parse(&body, 400, None);
    assert_eq!(back.key_path().segments(), ["a", "b", "c"]);
}

#[test]
fn stack_is_absent_unless_requested() {
    let err = specimen(ErrorKind::Internal);
    let body = err.to_json(&WireConfig::default());
    assert!(!body.as_object().unwrap().contains_key("stack"));
}

#[test]
fn reparsed_error_without_stack_captures_locally() {
    // Without a wire stack the receiver's own capture applies; it may be
    // empty when backtraces are disabled, but it never fails.
    let body = json!({"name": "internal-error", "message": "boom"});
    let back = parse(&body, 500, None);
    let _ = back.stacked();
}

// ===========================================================================
// 3. Transport facts win
// ===========================================================================

#[test]
fn received_status_beats_payload_status() {
    let body = json!({"name": "not-found", "message": "x", "statusCode": 500});
    let back = parse(&body, 404, None);
    assert_eq!(back.status_code(), 404);
}

#[test]
fn unknown_name_with_teapot_status() {
    let back = parse(&json!({"name": "totally-unknown", "message": "x"}), 418, None);
    assert_eq!(back.kind(), ErrorKind::Other);
    assert_eq!(back.status_code(), 418);
    assert_eq!(back.message(), "x");
}

#[test]
fn missing_name_parses_as_bad_request() {
    let back = parse(&json!({"message": "odd"}), 400, None);
    assert_eq!(back.kind(), ErrorKind::BadRequest);
}

// ===========================================================================
// 4. Strict policy
// ===========================================================================

#[test]
fn strict_config_rejects_what_lenient_coerces() {
    let body = json!({"name": "mystery", "message": "x"});
    let strict = ParseConfig {
        unknown_names: UnknownNames::Reject,
    };

    assert_eq!(parse(&body, 400, None).kind(), ErrorKind::Other);
    assert_eq!(
        try_parse(&body, 400, None, &strict).unwrap_err(),
        ParseError::UnknownName {
            name: "mystery".to_string()
        }
    );
}

#[test]
fn default_config_is_lenient() {
    let body = json!({"name": "mystery", "message": "x"});
    let back = try_parse(&body, 400, None, &ParseConfig::default()).unwrap();
    assert_eq!(back.kind(), ErrorKind::Other);
}
