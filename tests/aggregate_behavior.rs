// SPDX-License-Identifier: MIT OR Apache-2.0
//! Aggregated errors: ordered children, recursive serialization, and the
//! underlying-chain rules shared with every other kind.

use serde_json::json;
use wirefault::{parse, ApiError, ErrorKind, ErrorOptions, StackFrame, StackTrace, WireConfig};

fn root_stack() -> StackTrace {
    [StackFrame::new("storage::write").with_location("/srv/storage.rs", 207)]
        .into_iter()
        .collect()
}

// ===========================================================================
// 1. Child collection
// ===========================================================================

#[test]
fn children_accumulate_in_insertion_order() {
    let mut agg = ApiError::aggregate([ApiError::bad_request("one")]);
    agg.add(ApiError::not_found("two"));
    agg.add_all([ApiError::forbidden("three"), ApiError::conflict("four")]);

    let messages: Vec<_> = agg.errors().iter().map(ApiError::message).collect();
    assert_eq!(messages, ["one", "two", "three", "four"]);
}

#[test]
fn set_errors_is_all_or_nothing() {
    let mut agg = ApiError::aggregate([ApiError::bad_request("old")]);
    agg.set_errors(vec![ApiError::internal("a"), ApiError::internal("b")]);
    assert_eq!(agg.errors().len(), 2);

    agg.set_errors(Vec::new());
    assert!(agg.errors().is_empty());
}

#[test]
fn aggregate_of_aggregates_nests() {
    let inner = ApiError::aggregate([ApiError::not_found("leaf")]);
    let outer = ApiError::aggregate([inner, ApiError::forbidden("sibling")]);
    assert_eq!(outer.errors().len(), 2);
    assert_eq!(outer.errors()[0].errors()[0].message(), "leaf");
}

// ===========================================================================
// 2. Recursive serialization
// ===========================================================================

#[test]
fn wire_children_match_their_standalone_serialization() {
    let first = ApiError::bad_request("missing field").with_key_path("user.email");
    let second = ApiError::conflict("user already exists").with_entity("user");
    let expected = [
        first.to_json(&WireConfig::default()),
        second.to_json(&WireConfig::default()),
    ];

    let agg = ApiError::aggregate([first, second]);
    let body = agg.to_json(&WireConfig::default());

    assert_eq!(body["name"], json!("aggregated"));
    assert_eq!(body["message"], json!("Multiple errors occurred."));
    assert_eq!(body["errors"], serde_json::Value::Array(expected.to_vec()));
}

#[test]
fn nested_aggregates_serialize_to_any_depth() {
    let body = ApiError::aggregate([ApiError::aggregate([ApiError::not_found("leaf")])])
        .to_json(&WireConfig::default());
    assert_eq!(body["errors"][0]["errors"][0]["message"], json!("leaf"));
}

#[test]
fn include_stack_applies_to_children_too() {
    let child = ApiError::internal("boom").with_stack(root_stack());
    let body = ApiError::aggregate([child]).to_json(&WireConfig::with_stack());
    assert_eq!(
        body["errors"][0]["stack"][0]["function"],
        json!("storage::write")
    );
}

// ===========================================================================
// 3. Reconstruction
// ===========================================================================

#[test]
fn aggregated_payload_reparses_into_typed_children() {
    let original = ApiError::aggregate([
        ApiError::not_found("a"),
        ApiError::too_many_requests("b"),
    ]);
    let body = original.to_json(&WireConfig::default());
    let back = parse(&body, original.status_code(), None);

    assert_eq!(back.kind(), ErrorKind::Aggregated);
    let kinds: Vec<_> = back.errors().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, [ErrorKind::NotFound, ErrorKind::TooManyRequests]);
}

#[test]
fn rewrapping_a_parsed_aggregate_inherits_its_children() {
    let parsed = parse(
        &json!({
            "name": "aggregated",
            "errors": [
                {"name": "not-found", "message": "a"},
                {"name": "forbidden", "message": "b"},
            ],
        }),
        400,
        None,
    );
    let rewrapped = ApiError::from_options(
        ErrorKind::Aggregated,
        ErrorOptions {
            underlying: Some(Box::new(parsed)),
            ..ErrorOptions::default()
        },
    );
    // Wrapping an aggregate in a fresh aggregate adopts its collection.
    assert_eq!(rewrapped.errors().len(), 2);
    assert_eq!(rewrapped.errors()[0].kind(), ErrorKind::NotFound);
    assert_eq!(rewrapped.errors()[1].kind(), ErrorKind::Forbidden);
}

// ===========================================================================
// 4. Underlying chain
// ===========================================================================

#[test]
fn actual_resolves_through_two_wrappers() {
    let c = ApiError::internal("root cause").with_stack(root_stack());
    let b = ApiError::service_unavailable("middle").with_underlying(c);
    let a = ApiError::bad_request("outer").with_underlying(b);

    assert_eq!(a.actual().message(), "root cause");
    assert_eq!(a.stacked(), &root_stack());
}

#[test]
fn wire_stack_of_a_wrapper_is_the_roots() {
    let root = ApiError::internal("root cause").with_stack(root_stack());
    let wrapper = ApiError::bad_request("outer").with_underlying(root);
    let body = wrapper.to_json(&WireConfig::with_stack());
    assert_eq!(body["stack"][0]["function"], json!("storage::write"));
}
