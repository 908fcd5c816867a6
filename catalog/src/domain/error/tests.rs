//! Tests for the domain error payload and its serialised form.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn validation_error() -> Error {
    Error::invalid_request("Please fix the errors in the form")
        .with_details(json!({ "fields": { "name": "Coffee shop name is required" } }))
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::unauthorized(Error::unauthorized("login"), ErrorCode::Unauthorized)]
#[case::not_found(Error::not_found("gone"), ErrorCode::NotFound)]
#[case::conflict(Error::conflict("full"), ErrorCode::Conflict)]
#[case::unavailable(Error::service_unavailable("disk"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] err: Error, #[case] expected: ErrorCode) {
    assert_eq!(err.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn display_uses_message(validation_error: Error) {
    assert_eq!(validation_error.to_string(), "Please fix the errors in the form");
}

#[rstest]
fn only_unauthorized_requires_authentication() {
    assert!(Error::unauthorized("Please log in to add coffee shops").requires_authentication());
    assert!(!Error::conflict("full").requires_authentication());
}

#[rstest]
fn serialises_code_in_snake_case(validation_error: Error) {
    let value = serde_json::to_value(&validation_error).expect("serialise error");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(
        value["details"]["fields"]["name"],
        "Coffee shop name is required"
    );
}

#[rstest]
fn omits_missing_details() {
    let value = serde_json::to_value(Error::not_found("gone")).expect("serialise error");
    assert!(value.get("details").is_none());
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "not_found", "message": "  " }));
    assert!(result.is_err());
}
