//! Tests for application error types.

use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Validation(String::new()), 400, "validation_error")]
#[case(AppError::Unauthorized(String::new()), 401, "unauthorized")]
#[case(AppError::Forbidden(String::new()), 403, "forbidden")]
#[case(AppError::NotFound(String::new()), 404, "not_found")]
#[case(AppError::Conflict(String::new()), 409, "conflict")]
#[case(AppError::Database(String::new()), 500, "database_error")]
#[case(AppError::Internal(String::new()), 500, "internal_error")]
fn status_and_code_mapping(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.error_code(), code);
}

#[test]
fn display_includes_detail() {
    assert_eq!(
        AppError::Validation("testDate is required".into()).to_string(),
        "Validation error: testDate is required"
    );
    assert_eq!(
        AppError::Conflict("email already registered".into()).to_string(),
        "Conflict: email already registered"
    );
    assert_eq!(
        AppError::NotFound("project".into()).to_string(),
        "Not found: project"
    );
}
