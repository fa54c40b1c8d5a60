//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("cooldown"), ErrorCode::Conflict)]
#[case(Error::store_unavailable("no credentials"), ErrorCode::StoreUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::conflict("busy") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_envelope() {
    let error = Error::conflict("retake cooldown active")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "remainingHours": 4 }));

    let value = serde_json::to_value(&error).expect("serialise");
    assert_eq!(value["code"], "conflict");
    assert_eq!(value["message"], "retake cooldown active");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["details"]["remainingHours"], 4);
}

#[rstest]
fn omits_optional_fields_when_absent() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise");
    let object = value.as_object().expect("object");
    assert!(!object.contains_key("traceId"));
    assert!(!object.contains_key("details"));
}

#[rstest]
fn store_unavailable_serialises_snake_case() {
    let value = serde_json::to_value(ErrorCode::StoreUnavailable).expect("serialise");
    assert_eq!(value, json!("store_unavailable"));
}
