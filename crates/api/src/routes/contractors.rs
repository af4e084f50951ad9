//! Contractor and assignment routes.

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
use tracing::info;
use uuid::Uuid;

use crate::routes::support::{
    error_response, internal_error, invalid_field, missing_field, non_empty, not_found,
    require_role,
};
use crate::{AppState, middleware::AuthUser};
use trakim_db::{
    ContractorRepository,
    entities::{
        contractor_projects, contractors,
        sea_orm_active_enums::{CertificationLevel, ContractStatus},
    },
    repositories::{
        ContractorError, ContractorFilter, CreateAssignmentInput, CreateContractorInput,
        UpdateAssignmentInput, UpdateContractorInput,
    },
};
use trakim_shared::types::{PageRequest, PageResponse};

/// Creates the contractor routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contractors", get(list_contractors))
        .route("/contractors", post(create_contractor))
        .route("/contractors/{contractor_id}", get(get_contractor))
        .route("/contractors/{contractor_id}", put(update_contractor))
        .route("/contractors/{contractor_id}", delete(delete_contractor))
        .route(
            "/contractors/{contractor_id}/assignments",
            get(list_assignments),
        )
        .route(
            "/contractors/{contractor_id}/assignments",
            post(create_assignment),
        )
        .route(
            "/contractors/{contractor_id}/assignments/{assignment_id}",
            put(update_assignment),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing contractors.
#[derive(Debug, Deserialize)]
pub struct ListContractorsQuery {
    /// Certification level filter.
    pub certification_level: Option<String>,
    /// Active flag filter.
    pub is_active: Option<bool>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for creating a contractor.
#[derive(Debug, Deserialize)]
pub struct CreateContractorRequest {
    /// Company name.
    pub name: Option<String>,
    /// Unique license number.
    pub license_number: Option<String>,
    /// Certification level.
    pub certification_level: Option<String>,
    /// Specializations.
    #[serde(default)]
    pub specializations: Vec<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
}

/// Request body for a partial contractor update.
#[derive(Debug, Deserialize)]
pub struct UpdateContractorRequest {
    /// New company name.
    pub name: Option<String>,
    /// New certification level.
    pub certification_level: Option<String>,
    /// New specializations (replaces the whole set).
    pub specializations: Option<Vec<String>>,
    /// New contact email.
    pub contact_email: Option<String>,
    /// New contact phone.
    pub contact_phone: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Request body for assigning a contractor to a project.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    /// Project to assign to.
    pub project_id: Option<Uuid>,
    /// Contract value.
    pub contract_value: Option<Decimal>,
    /// Initial contract status.
    pub contract_status: Option<String>,
    /// Contract start date.
    pub start_date: Option<chrono::NaiveDate>,
    /// Contract end date.
    pub end_date: Option<chrono::NaiveDate>,
}

/// Request body for a partial assignment update.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    /// New contract value.
    pub contract_value: Option<Decimal>,
    /// New contract status.
    pub contract_status: Option<String>,
    /// New performance rating (0-5).
    pub performance_rating: Option<Decimal>,
    /// New end date.
    pub end_date: Option<chrono::NaiveDate>,
}

/// Response for a contractor.
#[derive(Debug, Serialize)]
pub struct ContractorResponse {
    /// Contractor ID.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// License number.
    pub license_number: String,
    /// Certification level (wire vocabulary).
    pub certification_level: String,
    /// Specializations.
    pub specializations: serde_json::Value,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Whether the contractor is active.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

/// Response for an assignment.
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    /// Assignment ID.
    pub id: Uuid,
    /// Contractor ID.
    pub contractor_id: Uuid,
    /// Project ID.
    pub project_id: Uuid,
    /// Contract value.
    pub contract_value: Decimal,
    /// Contract status (wire vocabulary).
    pub contract_status: String,
    /// Performance rating, if rated.
    pub performance_rating: Option<Decimal>,
    /// Contract start date.
    pub start_date: Option<chrono::NaiveDate>,
    /// Contract end date.
    pub end_date: Option<chrono::NaiveDate>,
}

fn contractor_to_response(contractor: contractors::Model) -> ContractorResponse {
    ContractorResponse {
        id: contractor.id,
        name: contractor.name,
        license_number: contractor.license_number,
        certification_level: contractor.certification_level.to_value(),
        specializations: contractor.specializations,
        contact_email: contractor.contact_email,
        contact_phone: contractor.contact_phone,
        is_active: contractor.is_active,
        created_at: contractor.created_at.to_rfc3339(),
    }
}

fn assignment_to_response(assignment: contractor_projects::Model) -> AssignmentResponse {
    AssignmentResponse {
        id: assignment.id,
        contractor_id: assignment.contractor_id,
        project_id: assignment.project_id,
        contract_value: assignment.contract_value,
        contract_status: assignment.contract_status.to_value(),
        performance_rating: assignment.performance_rating,
        start_date: assignment.start_date,
        end_date: assignment.end_date,
    }
}

/// Rejects callers whose role may not manage contractors.
fn check_manage_role(auth_user: &AuthUser) -> Result<(), axum::response::Response> {
    let role = require_role(auth_user)?;
    if role.can_manage_projects() {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not manage contractors",
        ))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /contractors
async fn list_contractors(
    State(state): State<AppState>,
    Query(query): Query<ListContractorsQuery>,
    _auth_user: AuthUser,
) -> impl IntoResponse {
    let certification_level = match non_empty(query.certification_level) {
        None => None,
        Some(s) => match CertificationLevel::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("certification_level", &s),
        },
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(25),
    };

    let repo = ContractorRepository::new((*state.db).clone());
    let filter = ContractorFilter {
        certification_level,
        is_active: query.is_active,
    };

    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data: Vec<ContractorResponse> =
                rows.into_iter().map(contractor_to_response).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /contractors
async fn create_contractor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateContractorRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_manage_role(&auth_user) {
        return response;
    }

    let Some(name) = payload.name.filter(|s| !s.trim().is_empty()) else {
        return missing_field("name");
    };
    let Some(license_number) = payload.license_number.filter(|s| !s.trim().is_empty()) else {
        return missing_field("license_number");
    };
    let Some(level_raw) = payload.certification_level.filter(|s| !s.is_empty()) else {
        return missing_field("certification_level");
    };
    let Ok(certification_level) = CertificationLevel::try_from_value(&level_raw) else {
        return invalid_field("certification_level", &level_raw);
    };

    let repo = ContractorRepository::new((*state.db).clone());
    let input = CreateContractorInput {
        name,
        license_number,
        certification_level,
        specializations: payload.specializations,
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
    };

    match repo.create(input).await {
        Ok(contractor) => {
            info!(contractor_id = %contractor.id, "Contractor registered");
            (StatusCode::CREATED, Json(contractor_to_response(contractor))).into_response()
        }
        Err(ContractorError::DuplicateLicense(license)) => error_response(
            StatusCode::CONFLICT,
            "conflict",
            format!("license number {license} already registered"),
        ),
        Err(e) => internal_error(&e),
    }
}

/// GET /contractors/{contractor_id}
async fn get_contractor(
    State(state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
    _auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = ContractorRepository::new((*state.db).clone());
    match repo.find_by_id(contractor_id).await {
        Ok(Some(contractor)) => {
            (StatusCode::OK, Json(contractor_to_response(contractor))).into_response()
        }
        Ok(None) => not_found("contractor"),
        Err(e) => internal_error(&e),
    }
}

/// PUT /contractors/{contractor_id}
async fn update_contractor(
    State(state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateContractorRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_manage_role(&auth_user) {
        return response;
    }

    let certification_level = match payload.certification_level {
        None => None,
        Some(s) => match CertificationLevel::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("certification_level", &s),
        },
    };

    let repo = ContractorRepository::new((*state.db).clone());
    let input = UpdateContractorInput {
        name: payload.name,
        certification_level,
        specializations: payload.specializations,
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
        is_active: payload.is_active,
    };

    match repo.update(contractor_id, input).await {
        Ok(contractor) => {
            (StatusCode::OK, Json(contractor_to_response(contractor))).into_response()
        }
        Err(ContractorError::NotFound(_)) => not_found("contractor"),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /contractors/{contractor_id}
async fn delete_contractor(
    State(state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    if let Err(response) = check_manage_role(&auth_user) {
        return response;
    }

    let repo = ContractorRepository::new((*state.db).clone());
    match repo.delete(contractor_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("contractor"),
        Err(e) => internal_error(&e),
    }
}

/// GET /contractors/{contractor_id}/assignments
async fn list_assignments(
    State(state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
    _auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = ContractorRepository::new((*state.db).clone());

    match repo.find_by_id(contractor_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("contractor"),
        Err(e) => return internal_error(&e),
    }

    match repo.list_assignments(contractor_id).await {
        Ok(assignments) => {
            let data: Vec<AssignmentResponse> =
                assignments.into_iter().map(assignment_to_response).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /contractors/{contractor_id}/assignments
async fn create_assignment(
    State(state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<CreateAssignmentRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_manage_role(&auth_user) {
        return response;
    }

    let Some(project_id) = payload.project_id else {
        return missing_field("project_id");
    };

    let contract_status = match payload.contract_status {
        None => None,
        Some(s) => match ContractStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("contract_status", &s),
        },
    };

    let repo = ContractorRepository::new((*state.db).clone());
    let input = CreateAssignmentInput {
        project_id,
        contract_value: payload.contract_value.unwrap_or(Decimal::ZERO),
        contract_status,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    match repo.assign(contractor_id, input).await {
        Ok(assignment) => {
            (StatusCode::CREATED, Json(assignment_to_response(assignment))).into_response()
        }
        Err(ContractorError::NotFound(_)) => not_found("contractor"),
        Err(ContractorError::ProjectNotFound(_)) => not_found("project"),
        Err(ContractorError::DuplicateAssignment) => error_response(
            StatusCode::CONFLICT,
            "conflict",
            "contractor already assigned to this project",
        ),
        Err(e) => internal_error(&e),
    }
}

/// PUT /contractors/{contractor_id}/assignments/{assignment_id}
async fn update_assignment(
    State(state): State<AppState>,
    Path((_contractor_id, assignment_id)): Path<(Uuid, Uuid)>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_manage_role(&auth_user) {
        return response;
    }

    let contract_status = match payload.contract_status {
        None => None,
        Some(s) => match ContractStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("contract_status", &s),
        },
    };

    let repo = ContractorRepository::new((*state.db).clone());
    let input = UpdateAssignmentInput {
        contract_value: payload.contract_value,
        contract_status,
        performance_rating: payload.performance_rating,
        end_date: payload.end_date,
    };

    match repo.update_assignment(assignment_id, input).await {
        Ok(assignment) => (StatusCode::OK, Json(assignment_to_response(assignment))).into_response(),
        Err(ContractorError::AssignmentNotFound(_)) => not_found("assignment"),
        Err(e) => internal_error(&e),
    }
}
