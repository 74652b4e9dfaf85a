//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::conflict("taken") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_to_camel_case_envelope(expected_trace_id: String) {
    let error = Error::conflict("title already used")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "title" }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value["code"], "conflict");
    assert_eq!(value["message"], "title already used");
    assert_eq!(value["traceId"], expected_trace_id.as_str());
    assert_eq!(value["details"]["field"], "title");
}

#[rstest]
fn deserialising_rejects_blank_trace_ids() {
    let payload = json!({ "code": "not_found", "message": "gone", "traceId": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
async fn deserialising_keeps_payload_trace_over_ambient(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({ "code": "forbidden", "message": "admins only" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("valid payload")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[derive(Debug, Clone)]
enum ConstructedError {
    Success,
    Failure(ErrorValidationError),
}

impl ConstructedError {
    fn from_result(result: Result<Error, ErrorValidationError>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => Self::Failure(err),
        }
    }
}

#[given("a well formed domain error payload")]
fn a_well_formed_domain_error_payload() -> (ErrorCode, String) {
    (ErrorCode::Conflict, "email already registered".to_owned())
}

#[given("a blank domain error message")]
fn a_blank_domain_error_message() -> (ErrorCode, String) {
    (ErrorCode::Conflict, "   ".to_owned())
}

#[when("the domain error is constructed")]
fn the_domain_error_is_constructed(payload: (ErrorCode, String)) -> ConstructedError {
    ConstructedError::from_result(Error::try_new(payload.0, payload.1))
}

#[then("the domain error construction succeeds")]
fn the_domain_error_construction_succeeds(result: ConstructedError) {
    assert!(matches!(result, ConstructedError::Success));
}

#[then("the domain error construction fails with an empty message")]
fn the_domain_error_construction_fails(result: ConstructedError) {
    assert!(matches!(
        result,
        ConstructedError::Failure(ErrorValidationError::EmptyMessage)
    ));
}

#[rstest]
fn constructing_a_domain_error_happy_path() {
    let payload = a_well_formed_domain_error_payload();
    let result = the_domain_error_is_constructed(payload);
    the_domain_error_construction_succeeds(result);
}

#[rstest]
fn constructing_a_domain_error_unhappy_path() {
    let payload = a_blank_domain_error_message();
    let result = the_domain_error_is_constructed(payload);
    the_domain_error_construction_fails(result);
}
