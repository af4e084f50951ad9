//! Progress report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::support::{
    ensure_project_access, error_response, internal_error, invalid_field, missing_field,
    non_empty, not_found, parse_date_param, parse_uuid_param, require_role,
};
use crate::{AppState, middleware::AuthUser};
use trakim_db::{
    ProgressRepository,
    entities::{progress_reports, sea_orm_active_enums::ScheduleStatus},
    repositories::{
        CreateProgressReportInput, ProgressError, ProgressFilter, UpdateProgressReportInput,
    },
};
use trakim_shared::types::{PageRequest, PageResponse};

/// Creates the progress report routes (requires auth middleware to be
/// applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/progress-reports", get(list_reports))
        .route("/progress-reports", post(create_report))
        .route("/progress-reports/{report_id}", get(get_report))
        .route("/progress-reports/{report_id}", put(update_report))
        .route("/progress-reports/{report_id}", delete(delete_report))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing progress reports.
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// Project filter.
    pub project_id: Option<String>,
    /// Section filter.
    pub section_id: Option<String>,
    /// Schedule status filter.
    pub schedule_status: Option<String>,
    /// Inclusive start of the `report_date` window.
    pub start_date: Option<String>,
    /// Inclusive end of the `report_date` window.
    pub end_date: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for filing a progress report.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Owning project.
    pub project_id: Option<Uuid>,
    /// Section, if section-scoped.
    pub section_id: Option<Uuid>,
    /// Reporting date.
    pub report_date: Option<chrono::NaiveDate>,
    /// Progress at the reporting date (0-100).
    pub current_progress: Option<Decimal>,
    /// Progress at the previous report (0-100).
    pub previous_progress: Option<Decimal>,
    /// Planned progress at the reporting date (0-100).
    pub planned_progress: Option<Decimal>,
    /// Schedule status.
    pub schedule_status: Option<String>,
    /// Completed work descriptions.
    #[serde(default)]
    pub works_completed: Vec<String>,
    /// Open issues.
    pub issues: Option<String>,
}

/// Request body for a partial progress report update.
#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    /// New current progress.
    pub current_progress: Option<Decimal>,
    /// New planned progress.
    pub planned_progress: Option<Decimal>,
    /// New schedule status.
    pub schedule_status: Option<String>,
    /// New completed-works list (replaces the whole list).
    pub works_completed: Option<Vec<String>>,
    /// New issues text.
    pub issues: Option<String>,
}

/// Response for a progress report.
#[derive(Debug, Serialize)]
pub struct ProgressReportResponse {
    /// Report ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Section, if section-scoped.
    pub section_id: Option<Uuid>,
    /// Reporting date.
    pub report_date: chrono::NaiveDate,
    /// Progress at the reporting date.
    pub current_progress: Decimal,
    /// Progress at the previous report.
    pub previous_progress: Decimal,
    /// Planned progress at the reporting date.
    pub planned_progress: Decimal,
    /// `current − previous`.
    pub progress_delta: Decimal,
    /// Schedule status (wire vocabulary).
    pub schedule_status: String,
    /// Completed work descriptions.
    pub works_completed: serde_json::Value,
    /// Open issues.
    pub issues: Option<String>,
    /// Reporting user.
    pub reported_by: Option<Uuid>,
}

fn report_to_response(report: progress_reports::Model) -> ProgressReportResponse {
    ProgressReportResponse {
        id: report.id,
        project_id: report.project_id,
        section_id: report.section_id,
        report_date: report.report_date,
        progress_delta: report.current_progress - report.previous_progress,
        current_progress: report.current_progress,
        previous_progress: report.previous_progress,
        planned_progress: report.planned_progress,
        schedule_status: report.schedule_status.to_value(),
        works_completed: report.works_completed,
        issues: report.issues,
        reported_by: report.reported_by,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /progress-reports
async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let project_id = match parse_uuid_param(query.project_id, "project_id") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let section_id = match parse_uuid_param(query.section_id, "section_id") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let start_date = match parse_date_param(query.start_date, "start_date") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let end_date = match parse_date_param(query.end_date, "end_date") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let schedule_status = match non_empty(query.schedule_status) {
        None => None,
        Some(s) => match ScheduleStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("schedule_status", &s),
        },
    };

    if let Some(project_id) = project_id
        && let Err(response) = ensure_project_access(&state, &auth_user, project_id, false).await
    {
        return response;
    }

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(25),
    };

    let repo = ProgressRepository::new((*state.db).clone());
    let filter = ProgressFilter {
        project_id,
        section_id,
        schedule_status,
        start_date,
        end_date,
    };

    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data: Vec<ProgressReportResponse> =
                rows.into_iter().map(report_to_response).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /progress-reports
async fn create_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateReportRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_file_progress_reports() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not file progress reports",
        );
    }

    let Some(project_id) = payload.project_id else {
        return missing_field("project_id");
    };
    let Some(report_date) = payload.report_date else {
        return missing_field("report_date");
    };
    let Some(current_progress) = payload.current_progress else {
        return missing_field("current_progress");
    };

    let schedule_status = match payload.schedule_status {
        None => ScheduleStatus::OnTrack,
        Some(s) => match ScheduleStatus::try_from_value(&s) {
            Ok(parsed) => parsed,
            Err(_) => return invalid_field("schedule_status", &s),
        },
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let repo = ProgressRepository::new((*state.db).clone());
    let input = CreateProgressReportInput {
        project_id,
        section_id: payload.section_id,
        report_date,
        current_progress,
        previous_progress: payload.previous_progress.unwrap_or(Decimal::ZERO),
        planned_progress: payload.planned_progress.unwrap_or(Decimal::ZERO),
        schedule_status,
        works_completed: payload.works_completed,
        issues: payload.issues,
        reported_by: Some(auth_user.user_id()),
    };

    match repo.create(input).await {
        Ok(report) => (StatusCode::CREATED, Json(report_to_response(report))).into_response(),
        Err(ProgressError::ProjectNotFound(_)) => not_found("project"),
        Err(e) => internal_error(&e),
    }
}

/// GET /progress-reports/{report_id}
async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = ProgressRepository::new((*state.db).clone());
    let report = match repo.find_by_id(report_id).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("progress report"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, report.project_id, false).await
    {
        return response;
    }

    (StatusCode::OK, Json(report_to_response(report))).into_response()
}

/// PUT /progress-reports/{report_id}
async fn update_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateReportRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_file_progress_reports() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not amend progress reports",
        );
    }

    let schedule_status = match payload.schedule_status {
        None => None,
        Some(s) => match ScheduleStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("schedule_status", &s),
        },
    };

    let repo = ProgressRepository::new((*state.db).clone());
    let existing = match repo.find_by_id(report_id).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("progress report"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, existing.project_id, true).await
    {
        return response;
    }

    let input = UpdateProgressReportInput {
        current_progress: payload.current_progress,
        planned_progress: payload.planned_progress,
        schedule_status,
        works_completed: payload.works_completed,
        issues: payload.issues,
    };

    match repo.update(report_id, input).await {
        Ok(report) => (StatusCode::OK, Json(report_to_response(report))).into_response(),
        Err(ProgressError::NotFound(_)) => not_found("progress report"),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /progress-reports/{report_id}
async fn delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not delete progress reports",
        );
    }

    let repo = ProgressRepository::new((*state.db).clone());
    match repo.delete(report_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("progress report"),
        Err(e) => internal_error(&e),
    }
}
