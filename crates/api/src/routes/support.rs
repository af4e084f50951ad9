//! Shared handler plumbing: error bodies, role checks, and project grants.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use trakim_core::auth::UserRole;
use trakim_db::{UserRepository, entities::sea_orm_active_enums::AccessLevel};

/// Builds an `{error, details}` response.
pub(crate) fn error_response(
    status: StatusCode,
    error: &str,
    details: impl Into<String>,
) -> Response {
    (
        status,
        Json(json!({ "error": error, "details": details.into() })),
    )
        .into_response()
}

/// 400 naming the offending field.
pub(crate) fn missing_field(field: &str) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("{field} is required"),
    )
}

/// 400 for an unparseable field value.
pub(crate) fn invalid_field(field: &str, value: &str) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("invalid {field}: {value}"),
    )
}

/// 500 after logging the underlying error.
pub(crate) fn internal_error(e: &impl std::fmt::Display) -> Response {
    error!(error = %e, "Request failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        e.to_string(),
    )
}

/// 404 for a missing entity.
pub(crate) fn not_found(entity: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, "not_found", format!("{entity} not found"))
}

/// Resolves the caller's role, rejecting tokens with unknown roles.
pub(crate) fn require_role(auth_user: &AuthUser) -> Result<UserRole, Response> {
    auth_user.role().ok_or_else(|| {
        error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Token carries an unrecognized role",
        )
    })
}

/// Checks that the caller may see the given project: global roles pass,
/// everyone else needs a `user_project_access` grant.
pub(crate) async fn ensure_project_access(
    state: &AppState,
    auth_user: &AuthUser,
    project_id: Uuid,
    needs_write: bool,
) -> Result<(), Response> {
    let role = require_role(auth_user)?;
    if role.has_global_project_access() {
        return Ok(());
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let grant = match user_repo
        .get_project_access(auth_user.user_id(), project_id)
        .await
    {
        Ok(g) => g,
        Err(e) => return Err(internal_error(&e)),
    };

    match grant {
        Some(g) if !needs_write || matches!(g.access_level, AccessLevel::Write | AccessLevel::Manage) => {
            Ok(())
        }
        Some(_) => Err(error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Write access to this project is required",
        )),
        None => Err(error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "No access to this project",
        )),
    }
}

/// Treats empty and whitespace-only query parameters as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses an optional UUID query parameter; `Err` names the field.
pub(crate) fn parse_uuid_param(value: Option<String>, field: &str) -> Result<Option<Uuid>, Response> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(|_| invalid_field(field, &s)),
    }
}

/// Parses an optional ISO date query parameter; `Err` names the field.
pub(crate) fn parse_date_param(
    value: Option<String>,
    field: &str,
) -> Result<Option<chrono::NaiveDate>, Response> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => s
            .parse::<chrono::NaiveDate>()
            .map(Some)
            .map_err(|_| invalid_field(field, &s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_params_are_absent() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(" x ".to_string())), Some("x".to_string()));
    }

    #[test]
    fn uuid_param_distinguishes_absent_from_invalid() {
        assert_eq!(parse_uuid_param(None, "project_id").unwrap(), None);
        assert_eq!(
            parse_uuid_param(Some(String::new()), "project_id").unwrap(),
            None
        );
        assert!(parse_uuid_param(Some("not-a-uuid".to_string()), "project_id").is_err());

        let id = Uuid::new_v4();
        assert_eq!(
            parse_uuid_param(Some(id.to_string()), "project_id").unwrap(),
            Some(id)
        );
    }

    #[test]
    fn date_param_parses_iso_dates() {
        let parsed = parse_date_param(Some("2024-06-15".to_string()), "start_date")
            .unwrap()
            .unwrap();
        assert_eq!(parsed, chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert!(parse_date_param(Some("15/06/2024".to_string()), "start_date").is_err());
    }
}
