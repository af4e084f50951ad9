//! Project and section routes.

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
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::support::{
    ensure_project_access, error_response, internal_error, invalid_field, missing_field,
    non_empty, not_found, parse_uuid_param, require_role,
};
use crate::{AppState, middleware::AuthUser};
use trakim_core::reports::aggregate::percentage;
use trakim_db::{
    ProjectRepository, SectionRepository, UserRepository,
    entities::{
        projects, provinces,
        sea_orm_active_enums::{AccessLevel, ProjectStatus, SectionStatus},
    },
    repositories::{
        CreateProjectInput, CreateSectionInput, ProjectError, ProjectFilter, SectionError,
        UpdateProjectInput, UpdateSectionInput,
    },
};
use trakim_shared::types::{PageRequest, PageResponse};

/// Creates the project routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/projects", post(create_project))
        .route("/projects/{project_id}", get(get_project))
        .route("/projects/{project_id}", put(update_project))
        .route("/projects/{project_id}", delete(delete_project))
        .route("/projects/{project_id}/sections", get(list_sections))
        .route("/projects/{project_id}/sections", post(create_section))
        .route(
            "/projects/{project_id}/sections/{section_id}",
            put(update_section),
        )
        .route(
            "/projects/{project_id}/sections/{section_id}",
            delete(delete_section),
        )
        .route("/projects/{project_id}/access", post(grant_access))
        .route(
            "/projects/{project_id}/access/{user_id}",
            delete(revoke_access),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing projects.
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    /// Province filter.
    pub province_id: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// A coordinate pair in a request body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CoordinatesBody {
    /// Latitude in decimal degrees.
    pub latitude: Decimal,
    /// Longitude in decimal degrees.
    pub longitude: Decimal,
}

/// Request body for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: Option<String>,
    /// Province ID.
    pub province_id: Option<Uuid>,
    /// Initial status.
    pub status: Option<String>,
    /// Total road distance in metres.
    pub total_distance_m: Option<Decimal>,
    /// Road start coordinates.
    pub start_coordinates: Option<CoordinatesBody>,
    /// Road end coordinates.
    pub end_coordinates: Option<CoordinatesBody>,
    /// Funding sponsor.
    pub sponsor: Option<String>,
    /// Team lead name.
    pub team_lead: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Request body for a partial project update.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name.
    pub name: Option<String>,
    /// New province.
    pub province_id: Option<Uuid>,
    /// New status.
    pub status: Option<String>,
    /// New total distance in metres.
    pub total_distance_m: Option<Decimal>,
    /// New sponsor.
    pub sponsor: Option<String>,
    /// New team lead.
    pub team_lead: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Request body for creating a section.
#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    /// Section name.
    pub name: Option<String>,
    /// Chainage start in kilometres.
    pub start_km: Option<Decimal>,
    /// Chainage end in kilometres.
    pub end_km: Option<Decimal>,
    /// Length in metres (derived from chainage when absent).
    pub length_m: Option<Decimal>,
    /// Budget allocated.
    pub budget_allocated: Option<Decimal>,
    /// Assigned contractor.
    pub contractor_id: Option<Uuid>,
}

/// Request body for a partial section update.
#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    /// New name.
    pub name: Option<String>,
    /// New progress percentage.
    pub progress_pct: Option<Decimal>,
    /// New allocated budget.
    pub budget_allocated: Option<Decimal>,
    /// New spent budget.
    pub budget_spent: Option<Decimal>,
    /// New assigned contractor.
    pub contractor_id: Option<Uuid>,
    /// New status.
    pub status: Option<String>,
}

/// Request body for granting project access.
#[derive(Debug, Deserialize)]
pub struct GrantAccessRequest {
    /// User to grant access to.
    pub user_id: Option<Uuid>,
    /// Access level (`read`, `write`, `manage`).
    pub access_level: Option<String>,
}

/// Province in a project response.
#[derive(Debug, Serialize)]
pub struct ProvinceResponse {
    /// Province ID.
    pub id: Uuid,
    /// Province name.
    pub name: String,
    /// Short code.
    pub code: String,
}

/// Response for a project.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    /// Project ID.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Province, when loaded.
    pub province: Option<ProvinceResponse>,
    /// Status (wire vocabulary).
    pub status: String,
    /// Total road distance in metres.
    pub total_distance_m: Decimal,
    /// Start latitude.
    pub start_latitude: Option<Decimal>,
    /// Start longitude.
    pub start_longitude: Option<Decimal>,
    /// End latitude.
    pub end_latitude: Option<Decimal>,
    /// End longitude.
    pub end_longitude: Option<Decimal>,
    /// Funding sponsor.
    pub sponsor: Option<String>,
    /// Team lead.
    pub team_lead: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a section.
#[derive(Debug, Serialize)]
pub struct SectionResponse {
    /// Section ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Section name.
    pub name: String,
    /// Chainage start in kilometres.
    pub start_km: Decimal,
    /// Chainage end in kilometres.
    pub end_km: Decimal,
    /// Length in metres.
    pub length_m: Decimal,
    /// Progress percentage.
    pub progress_pct: Decimal,
    /// Budget allocated.
    pub budget_allocated: Decimal,
    /// Budget spent.
    pub budget_spent: Decimal,
    /// `spent / allocated × 100`.
    pub budget_utilization_pct: Decimal,
    /// Assigned contractor.
    pub contractor_id: Option<Uuid>,
    /// Section status (wire vocabulary).
    pub status: String,
}

fn project_to_response(project: projects::Model, province: Option<provinces::Model>) -> ProjectResponse {
    ProjectResponse {
        id: project.id,
        name: project.name,
        province: province.map(|p| ProvinceResponse {
            id: p.id,
            name: p.name,
            code: p.code,
        }),
        status: project.status.to_value(),
        total_distance_m: project.total_distance_m,
        start_latitude: project.start_latitude,
        start_longitude: project.start_longitude,
        end_latitude: project.end_latitude,
        end_longitude: project.end_longitude,
        sponsor: project.sponsor,
        team_lead: project.team_lead,
        description: project.description,
        created_at: project.created_at.to_rfc3339(),
        updated_at: project.updated_at.to_rfc3339(),
    }
}

fn section_to_response(section: trakim_db::entities::project_sections::Model) -> SectionResponse {
    SectionResponse {
        id: section.id,
        project_id: section.project_id,
        name: section.name,
        start_km: section.start_km,
        end_km: section.end_km,
        length_m: section.length_m,
        progress_pct: section.progress_pct,
        budget_utilization_pct: percentage(section.budget_spent, section.budget_allocated),
        budget_allocated: section.budget_allocated,
        budget_spent: section.budget_spent,
        contractor_id: section.contractor_id,
        status: section.status.to_value(),
    }
}

// ============================================================================
// Project Handlers
// ============================================================================

/// GET /projects
async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };

    let province_id = match parse_uuid_param(query.province_id, "province_id") {
        Ok(v) => v,
        Err(response) => return response,
    };

    let status = match non_empty(query.status) {
        None => None,
        Some(s) => match ProjectStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    // Non-global roles only see granted projects
    let project_ids = if role.has_global_project_access() {
        None
    } else {
        let user_repo = UserRepository::new((*state.db).clone());
        match user_repo.accessible_project_ids(auth_user.user_id()).await {
            Ok(ids) => Some(ids),
            Err(e) => return internal_error(&e),
        }
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(25),
    };

    let repo = ProjectRepository::new((*state.db).clone());
    let filter = ProjectFilter {
        province_id,
        status,
        project_ids,
    };

    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data: Vec<ProjectResponse> = rows
                .into_iter()
                .map(|(project, province)| project_to_response(project, province))
                .collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /projects
async fn create_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not create projects",
        );
    }

    let Some(name) = payload.name.filter(|s| !s.trim().is_empty()) else {
        return missing_field("name");
    };
    let Some(province_id) = payload.province_id else {
        return missing_field("province_id");
    };

    let status = match payload.status {
        None => None,
        Some(s) => match ProjectStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    let repo = ProjectRepository::new((*state.db).clone());
    let input = CreateProjectInput {
        name,
        province_id,
        status,
        total_distance_m: payload.total_distance_m.unwrap_or(Decimal::ZERO),
        start_coordinates: payload.start_coordinates.map(|c| (c.latitude, c.longitude)),
        end_coordinates: payload.end_coordinates.map(|c| (c.latitude, c.longitude)),
        sponsor: payload.sponsor,
        team_lead: payload.team_lead,
        description: payload.description,
    };

    match repo.create(input).await {
        Ok(project) => {
            info!(project_id = %project.id, "Project created");
            (StatusCode::CREATED, Json(project_to_response(project, None))).into_response()
        }
        Err(ProjectError::ProvinceNotFound(id)) => error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("province {id} does not exist"),
        ),
        Err(e) => internal_error(&e),
    }
}

/// GET /projects/{project_id}
async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, false).await {
        return response;
    }

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.find_by_id(project_id).await {
        Ok(Some((project, province))) => {
            (StatusCode::OK, Json(project_to_response(project, province))).into_response()
        }
        Ok(None) => not_found("project"),
        Err(e) => internal_error(&e),
    }
}

/// PUT /projects/{project_id}
async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProjectRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not update projects",
        );
    }
    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let status = match payload.status {
        None => None,
        Some(s) => match ProjectStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    let repo = ProjectRepository::new((*state.db).clone());
    let input = UpdateProjectInput {
        name: payload.name,
        province_id: payload.province_id,
        status,
        total_distance_m: payload.total_distance_m,
        sponsor: payload.sponsor,
        team_lead: payload.team_lead,
        description: payload.description,
    };

    match repo.update(project_id, input).await {
        Ok(project) => (StatusCode::OK, Json(project_to_response(project, None))).into_response(),
        Err(ProjectError::NotFound(_)) => not_found("project"),
        Err(ProjectError::ProvinceNotFound(id)) => error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("province {id} does not exist"),
        ),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /projects/{project_id}
async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
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
            "Role may not delete projects",
        );
    }

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.delete(project_id).await {
        Ok(true) => {
            info!(project_id = %project_id, "Project deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Ok(false) => not_found("project"),
        Err(e) => internal_error(&e),
    }
}

// ============================================================================
// Section Handlers
// ============================================================================

/// GET /projects/{project_id}/sections
async fn list_sections(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, false).await {
        return response;
    }

    let repo = SectionRepository::new((*state.db).clone());
    match repo.list_by_project(project_id).await {
        Ok(sections) => {
            let data: Vec<SectionResponse> =
                sections.into_iter().map(section_to_response).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /projects/{project_id}/sections
async fn create_section(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<CreateSectionRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not create sections",
        );
    }
    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let Some(name) = payload.name.filter(|s| !s.trim().is_empty()) else {
        return missing_field("name");
    };
    let Some(start_km) = payload.start_km else {
        return missing_field("start_km");
    };
    let Some(end_km) = payload.end_km else {
        return missing_field("end_km");
    };

    let repo = SectionRepository::new((*state.db).clone());
    let input = CreateSectionInput {
        name,
        start_km,
        end_km,
        length_m: payload.length_m,
        budget_allocated: payload.budget_allocated.unwrap_or(Decimal::ZERO),
        contractor_id: payload.contractor_id,
    };

    match repo.create(project_id, input).await {
        Ok(section) => (StatusCode::CREATED, Json(section_to_response(section))).into_response(),
        Err(SectionError::ProjectNotFound(_)) => not_found("project"),
        Err(SectionError::InvalidChainage { start, end }) => error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("end_km {end} is before start_km {start}"),
        ),
        Err(e) => internal_error(&e),
    }
}

/// PUT /projects/{project_id}/sections/{section_id}
async fn update_section(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(Uuid, Uuid)>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateSectionRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not update sections",
        );
    }
    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let status = match payload.status {
        None => None,
        Some(s) => match SectionStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    let repo = SectionRepository::new((*state.db).clone());

    // The section must belong to the project in the path
    match repo.find_by_id(section_id).await {
        Ok(Some(section)) if section.project_id == project_id => {}
        Ok(_) => return not_found("section"),
        Err(e) => return internal_error(&e),
    }

    let input = UpdateSectionInput {
        name: payload.name,
        progress_pct: payload.progress_pct,
        budget_allocated: payload.budget_allocated,
        budget_spent: payload.budget_spent,
        contractor_id: payload.contractor_id,
        status,
    };

    match repo.update(section_id, input).await {
        Ok(section) => (StatusCode::OK, Json(section_to_response(section))).into_response(),
        Err(SectionError::NotFound(_)) => not_found("section"),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /projects/{project_id}/sections/{section_id}
async fn delete_section(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(Uuid, Uuid)>,
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
            "Role may not delete sections",
        );
    }

    let repo = SectionRepository::new((*state.db).clone());
    match repo.find_by_id(section_id).await {
        Ok(Some(section)) if section.project_id == project_id => {}
        Ok(_) => return not_found("section"),
        Err(e) => return internal_error(&e),
    }

    match repo.delete(section_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("section"),
        Err(e) => internal_error(&e),
    }
}

// ============================================================================
// Access Grant Handlers
// ============================================================================

/// POST /projects/{project_id}/access
async fn grant_access(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<GrantAccessRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.has_global_project_access() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not manage project access",
        );
    }

    let Some(user_id) = payload.user_id else {
        return missing_field("user_id");
    };
    let Some(level_raw) = payload.access_level.filter(|s| !s.is_empty()) else {
        return missing_field("access_level");
    };
    let Ok(access_level) = AccessLevel::try_from_value(&level_raw) else {
        return invalid_field("access_level", &level_raw);
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("user"),
        Err(e) => return internal_error(&e),
    }

    let project_repo = ProjectRepository::new((*state.db).clone());
    match project_repo.find_by_id(project_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("project"),
        Err(e) => return internal_error(&e),
    }

    match user_repo
        .grant_project_access(user_id, project_id, access_level)
        .await
    {
        Ok(grant) => (StatusCode::CREATED, Json(grant)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to grant project access");
            internal_error(&e)
        }
    }
}

/// DELETE /projects/{project_id}/access/{user_id}
async fn revoke_access(
    State(state): State<AppState>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.has_global_project_access() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not manage project access",
        );
    }

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.revoke_project_access(user_id, project_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("access grant"),
        Err(e) => internal_error(&e),
    }
}
