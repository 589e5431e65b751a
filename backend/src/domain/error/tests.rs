//! Tests for the categorised error taxonomy and its serialised form.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(ErrorCode::Generic(GenericCode::AlreadyExists), ErrorCategory::Generic, "ALREADY_EXISTS")]
#[case(ErrorCode::Generic(GenericCode::InvalidArgument), ErrorCategory::Generic, "INVALID_ARGUMENT")]
#[case(ErrorCode::Generic(GenericCode::Internal), ErrorCategory::Generic, "INTERNAL")]
#[case(ErrorCode::Generic(GenericCode::NotFound), ErrorCategory::Generic, "NOT_FOUND")]
#[case(ErrorCode::DataAccess(DataAccessCode::InsertFailed), ErrorCategory::DataAccess, "INSERT_FAILED")]
#[case(ErrorCode::DataAccess(DataAccessCode::SelectFailed), ErrorCategory::DataAccess, "SELECT_FAILED")]
#[case(ErrorCode::DataAccess(DataAccessCode::DeleteFailed), ErrorCategory::DataAccess, "DELETE_FAILED")]
#[case(ErrorCode::DataAccess(DataAccessCode::UpdateFailed), ErrorCategory::DataAccess, "UPDATE_FAILED")]
fn codes_map_to_stable_category_and_text(
    #[case] code: ErrorCode,
    #[case] category: ErrorCategory,
    #[case] text: &str,
) {
    assert_eq!(code.category(), category);
    assert_eq!(code.as_str(), text);
    assert_eq!(ErrorCode::parse(category, text), Some(code));
}

#[rstest]
fn convenience_constructors_pick_generic_codes() {
    assert!(Error::already_exists("m", "d").is(GenericCode::AlreadyExists));
    assert!(Error::invalid_argument("m", "d").is(GenericCode::InvalidArgument));
    assert!(Error::internal("m", "d").is(GenericCode::Internal));
    assert!(Error::not_found("m", "d").is(GenericCode::NotFound));
}

#[rstest]
fn data_access_constructor_sets_category() {
    let err = Error::data_access(DataAccessCode::SelectFailed, "unable to get payment", "boom");
    assert_eq!(err.category(), ErrorCategory::DataAccess);
    assert_eq!(err.message(), "unable to get payment");
    assert_eq!(err.detail(), "boom");
    assert!(err.extra().is_none());
}

#[rstest]
fn display_renders_message_only() {
    let err = Error::not_found("unable to get payment", "no rows returned");
    assert_eq!(err.to_string(), "unable to get payment");
}

#[rstest]
fn extra_entries_accumulate_and_replace() {
    let err = Error::invalid_argument("bad", "")
        .with_extra("attempt", 1_i64)
        .with_extra("field", "scheme")
        .with_extra("attempt", 2_i64);
    let extra = err.extra().expect("extra present");
    assert_eq!(extra.len(), 2);
    assert_eq!(extra.get("attempt"), Some(&ExtraValue::Integer(2)));
    assert_eq!(extra.get("field"), Some(&ExtraValue::Text("scheme".to_owned())));
}

#[rstest]
fn serialises_category_alongside_code() {
    let err = Error::data_access(DataAccessCode::InsertFailed, "unable to insert payment", "x")
        .with_extra("retryable", true);
    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "category": "DATA_ACCESS",
            "code": "INSERT_FAILED",
            "message": "unable to insert payment",
            "detail": "x",
            "extra": {"retryable": true}
        })
    );
}

#[rstest]
fn omits_extra_when_absent() {
    let value = serde_json::to_value(Error::not_found("m", "d")).expect("serialise error");
    assert!(value.get("extra").is_none());
}

#[rstest]
fn deserialises_valid_payload() {
    let err: Error = serde_json::from_value(json!({
        "category": "GENERIC",
        "code": "NOT_FOUND",
        "message": "missing",
        "extra": {"count": 3, "ratio": 0.5}
    }))
    .expect("valid payload");
    assert!(err.is(GenericCode::NotFound));
    assert_eq!(err.detail(), "");
    let extra = err.extra().expect("extra present");
    assert_eq!(extra.get("count"), Some(&ExtraValue::Integer(3)));
    assert_eq!(extra.get("ratio"), Some(&ExtraValue::Float(0.5)));
}

#[rstest]
#[case("GENERIC", "SELECT_FAILED")]
#[case("DATA_ACCESS", "NOT_FOUND")]
#[case("GENERIC", "UNKNOWN")]
fn rejects_code_outside_its_category(#[case] category: &str, #[case] code: &str) {
    let result = serde_json::from_value::<Error>(json!({
        "category": category,
        "code": code,
        "message": "m",
        "detail": "d"
    }));
    let err = result.expect_err("category mismatch");
    assert!(err.to_string().contains("does not belong to category"));
}
