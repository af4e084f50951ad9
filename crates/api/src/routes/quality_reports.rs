//! Quality/HSE report routes.
//!
//! Create and amend require an admin, QA/QC officer, site engineer, or
//! program manager; delete is restricted to admins and QA/QC officers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::routes::support::{
    ensure_project_access, error_response, internal_error, invalid_field, missing_field,
    non_empty, not_found, parse_date_param, parse_uuid_param, require_role,
};
use crate::{AppState, middleware::AuthUser};
use trakim_db::{
    QualityRepository,
    entities::{
        quality_reports,
        sea_orm_active_enums::{ComplianceStatus, QaQcStatus, QualityReportType},
    },
    repositories::{
        CreateQualityReportInput, QualityError, QualityFilter, UpdateQualityReportInput,
    },
};
use trakim_shared::types::{PageRequest, PageResponse};

/// Creates the quality report routes (requires auth middleware to be
/// applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quality-reports", get(list_reports))
        .route("/quality-reports", post(create_report))
        .route("/quality-reports/{report_id}", get(get_report))
        .route("/quality-reports/{report_id}", put(update_report))
        .route("/quality-reports/{report_id}", delete(delete_report))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing quality reports.
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// Project filter.
    pub project_id: Option<String>,
    /// Section filter.
    pub section_id: Option<String>,
    /// Report type filter.
    pub report_type: Option<String>,
    /// QA/QC outcome filter.
    pub qa_qc_status: Option<String>,
    /// Inclusive start of the `test_date` window.
    pub start_date: Option<String>,
    /// Inclusive end of the `test_date` window.
    pub end_date: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for filing a quality report.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Owning project.
    pub project_id: Option<Uuid>,
    /// Section, if section-scoped.
    pub section_id: Option<Uuid>,
    /// Report type.
    pub report_type: Option<String>,
    /// Test/inspection date.
    pub test_date: Option<chrono::NaiveDate>,
    /// Specification compliance outcome.
    pub spec_compliance: Option<String>,
    /// Environmental compliance outcome.
    pub environmental_compliance: Option<String>,
    /// Social compliance outcome.
    pub social_compliance: Option<String>,
    /// Quality-gate outcome.
    pub qa_qc_status: Option<String>,
    /// Deficiency descriptions.
    #[serde(default)]
    pub deficiencies: Vec<String>,
    /// Corrective actions.
    #[serde(default)]
    pub corrective_actions: Vec<String>,
    /// Whether a follow-up is required.
    #[serde(default)]
    pub follow_up_required: bool,
    /// Follow-up date.
    pub follow_up_date: Option<chrono::NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for a partial quality report update.
#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    /// New spec compliance outcome.
    pub spec_compliance: Option<String>,
    /// New environmental compliance outcome.
    pub environmental_compliance: Option<String>,
    /// New social compliance outcome.
    pub social_compliance: Option<String>,
    /// New quality-gate outcome.
    pub qa_qc_status: Option<String>,
    /// New deficiencies (replaces the whole list).
    pub deficiencies: Option<Vec<String>>,
    /// New corrective actions (replaces the whole list).
    pub corrective_actions: Option<Vec<String>>,
    /// New follow-up flag.
    pub follow_up_required: Option<bool>,
    /// New follow-up date.
    pub follow_up_date: Option<chrono::NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Response for a quality report.
#[derive(Debug, Serialize)]
pub struct QualityReportResponse {
    /// Report ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Section, if section-scoped.
    pub section_id: Option<Uuid>,
    /// Report type (wire vocabulary).
    pub report_type: String,
    /// Test/inspection date.
    pub test_date: chrono::NaiveDate,
    /// Specification compliance outcome.
    pub spec_compliance: String,
    /// Environmental compliance outcome.
    pub environmental_compliance: String,
    /// Social compliance outcome.
    pub social_compliance: String,
    /// Quality-gate outcome.
    pub qa_qc_status: String,
    /// Deficiency descriptions.
    pub deficiencies: serde_json::Value,
    /// Corrective actions.
    pub corrective_actions: serde_json::Value,
    /// Whether a follow-up is required.
    pub follow_up_required: bool,
    /// Follow-up date.
    pub follow_up_date: Option<chrono::NaiveDate>,
    /// Inspecting user.
    pub inspector_id: Option<Uuid>,
    /// Notes.
    pub notes: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

fn report_to_response(report: quality_reports::Model) -> QualityReportResponse {
    QualityReportResponse {
        id: report.id,
        project_id: report.project_id,
        section_id: report.section_id,
        report_type: report.report_type.to_value(),
        test_date: report.test_date,
        spec_compliance: report.spec_compliance.to_value(),
        environmental_compliance: report.environmental_compliance.to_value(),
        social_compliance: report.social_compliance.to_value(),
        qa_qc_status: report.qa_qc_status.to_value(),
        deficiencies: report.deficiencies,
        corrective_actions: report.corrective_actions,
        follow_up_required: report.follow_up_required,
        follow_up_date: report.follow_up_date,
        inspector_id: report.inspector_id,
        notes: report.notes,
        created_at: report.created_at.to_rfc3339(),
    }
}

/// Parses an optional compliance field, defaulting to not applicable.
fn parse_compliance(
    value: Option<String>,
    field: &str,
) -> Result<ComplianceStatus, axum::response::Response> {
    match value {
        None => Ok(ComplianceStatus::NotApplicable),
        Some(s) => ComplianceStatus::try_from_value(&s).map_err(|_| invalid_field(field, &s)),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /quality-reports
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

    let report_type = match non_empty(query.report_type) {
        None => None,
        Some(s) => match QualityReportType::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("report_type", &s),
        },
    };
    let qa_qc_status = match non_empty(query.qa_qc_status) {
        None => None,
        Some(s) => match QaQcStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("qa_qc_status", &s),
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

    let repo = QualityRepository::new((*state.db).clone());
    let filter = QualityFilter {
        project_id,
        section_id,
        report_type,
        qa_qc_status,
        start_date,
        end_date,
    };

    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data: Vec<QualityReportResponse> =
                rows.into_iter().map(report_to_response).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /quality-reports
async fn create_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateReportRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_file_quality_reports() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not file quality reports",
        );
    }

    let Some(project_id) = payload.project_id else {
        return missing_field("project_id");
    };
    let Some(type_raw) = payload.report_type.filter(|s| !s.is_empty()) else {
        return missing_field("report_type");
    };
    let Ok(report_type) = QualityReportType::try_from_value(&type_raw) else {
        return invalid_field("report_type", &type_raw);
    };
    let Some(test_date) = payload.test_date else {
        return missing_field("test_date");
    };
    let Some(status_raw) = payload.qa_qc_status.filter(|s| !s.is_empty()) else {
        return missing_field("qa_qc_status");
    };
    let Ok(qa_qc_status) = QaQcStatus::try_from_value(&status_raw) else {
        return invalid_field("qa_qc_status", &status_raw);
    };

    let spec_compliance = match parse_compliance(payload.spec_compliance, "spec_compliance") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let environmental_compliance = match parse_compliance(
        payload.environmental_compliance,
        "environmental_compliance",
    ) {
        Ok(v) => v,
        Err(response) => return response,
    };
    let social_compliance = match parse_compliance(payload.social_compliance, "social_compliance")
    {
        Ok(v) => v,
        Err(response) => return response,
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let repo = QualityRepository::new((*state.db).clone());
    let input = CreateQualityReportInput {
        project_id,
        section_id: payload.section_id,
        report_type,
        test_date,
        spec_compliance,
        environmental_compliance,
        social_compliance,
        qa_qc_status,
        deficiencies: payload.deficiencies,
        corrective_actions: payload.corrective_actions,
        follow_up_required: payload.follow_up_required,
        follow_up_date: payload.follow_up_date,
        inspector_id: Some(auth_user.user_id()),
        notes: payload.notes,
    };

    match repo.create(input).await {
        Ok(report) => {
            info!(report_id = %report.id, project_id = %report.project_id, "Quality report filed");
            (StatusCode::CREATED, Json(report_to_response(report))).into_response()
        }
        Err(QualityError::ProjectNotFound(_)) => not_found("project"),
        Err(e) => internal_error(&e),
    }
}

/// GET /quality-reports/{report_id}
async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = QualityRepository::new((*state.db).clone());
    let report = match repo.find_by_id(report_id).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("quality report"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, report.project_id, false).await
    {
        return response;
    }

    (StatusCode::OK, Json(report_to_response(report))).into_response()
}

/// PUT /quality-reports/{report_id}
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
    if !role.can_file_quality_reports() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not amend quality reports",
        );
    }

    let repo = QualityRepository::new((*state.db).clone());
    let existing = match repo.find_by_id(report_id).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("quality report"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, existing.project_id, true).await
    {
        return response;
    }

    let mut input = UpdateQualityReportInput {
        deficiencies: payload.deficiencies,
        corrective_actions: payload.corrective_actions,
        follow_up_required: payload.follow_up_required,
        follow_up_date: payload.follow_up_date,
        notes: payload.notes,
        ..UpdateQualityReportInput::default()
    };

    if let Some(s) = payload.spec_compliance {
        match ComplianceStatus::try_from_value(&s) {
            Ok(parsed) => input.spec_compliance = Some(parsed),
            Err(_) => return invalid_field("spec_compliance", &s),
        }
    }
    if let Some(s) = payload.environmental_compliance {
        match ComplianceStatus::try_from_value(&s) {
            Ok(parsed) => input.environmental_compliance = Some(parsed),
            Err(_) => return invalid_field("environmental_compliance", &s),
        }
    }
    if let Some(s) = payload.social_compliance {
        match ComplianceStatus::try_from_value(&s) {
            Ok(parsed) => input.social_compliance = Some(parsed),
            Err(_) => return invalid_field("social_compliance", &s),
        }
    }
    if let Some(s) = payload.qa_qc_status {
        match QaQcStatus::try_from_value(&s) {
            Ok(parsed) => input.qa_qc_status = Some(parsed),
            Err(_) => return invalid_field("qa_qc_status", &s),
        }
    }

    match repo.update(report_id, input).await {
        Ok(report) => (StatusCode::OK, Json(report_to_response(report))).into_response(),
        Err(QualityError::NotFound(_)) => not_found("quality report"),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /quality-reports/{report_id}
async fn delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_delete_quality_reports() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Only admins and QA/QC officers may delete quality reports",
        );
    }

    let repo = QualityRepository::new((*state.db).clone());
    match repo.delete(report_id).await {
        Ok(true) => {
            info!(report_id = %report_id, "Quality report deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Ok(false) => not_found("quality report"),
        Err(e) => internal_error(&e),
    }
}
