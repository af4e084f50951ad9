//! Milestone routes, including the audit trail of status changes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::support::{
    ensure_project_access, error_response, internal_error, invalid_field, missing_field,
    not_found, parse_uuid_param, require_role,
};
use crate::{AppState, middleware::AuthUser};
use trakim_db::{
    MilestoneRepository,
    entities::{
        milestone_updates, milestones,
        sea_orm_active_enums::{MilestoneCategory, MilestoneStatus},
    },
    repositories::{
        CreateMilestoneInput, CreateMilestoneUpdateInput, MilestoneError, UpdateMilestoneInput,
    },
};

/// Creates the milestone routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/milestones", get(list_milestones))
        .route("/milestones", post(create_milestone))
        .route("/milestones/{milestone_id}", get(get_milestone))
        .route("/milestones/{milestone_id}", put(update_milestone))
        .route("/milestones/{milestone_id}", delete(delete_milestone))
        .route("/milestones/{milestone_id}/updates", get(list_updates))
        .route("/milestones/{milestone_id}/updates", post(add_update))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing milestones.
#[derive(Debug, Deserialize)]
pub struct ListMilestonesQuery {
    /// Project to list milestones for (required).
    pub project_id: Option<String>,
}

/// Request body for creating a milestone.
#[derive(Debug, Deserialize)]
pub struct CreateMilestoneRequest {
    /// Owning project.
    pub project_id: Option<Uuid>,
    /// Milestone name.
    pub name: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Planned achievement date.
    pub planned_date: Option<chrono::NaiveDate>,
}

/// Request body for a partial milestone update.
#[derive(Debug, Deserialize)]
pub struct UpdateMilestoneRequest {
    /// New name.
    pub name: Option<String>,
    /// New planned date.
    pub planned_date: Option<chrono::NaiveDate>,
    /// Actual achievement date.
    pub actual_date: Option<chrono::NaiveDate>,
    /// New status.
    pub status: Option<String>,
}

/// Request body for recording a status change.
#[derive(Debug, Deserialize)]
pub struct AddUpdateRequest {
    /// New status.
    pub status: Option<String>,
    /// Note explaining the change.
    pub note: Option<String>,
}

/// Response for a milestone.
#[derive(Debug, Serialize)]
pub struct MilestoneResponse {
    /// Milestone ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Milestone name.
    pub name: String,
    /// Category (wire vocabulary).
    pub category: String,
    /// Planned date.
    pub planned_date: chrono::NaiveDate,
    /// Actual date, when achieved.
    pub actual_date: Option<chrono::NaiveDate>,
    /// Status (wire vocabulary).
    pub status: String,
}

/// Response for an audit row.
#[derive(Debug, Serialize)]
pub struct MilestoneUpdateResponse {
    /// Audit row ID.
    pub id: Uuid,
    /// Milestone ID.
    pub milestone_id: Uuid,
    /// Recorded status.
    pub status: String,
    /// Note.
    pub note: Option<String>,
    /// Recording user.
    pub updated_by: Option<Uuid>,
    /// When the change was recorded.
    pub created_at: String,
}

fn milestone_to_response(milestone: milestones::Model) -> MilestoneResponse {
    MilestoneResponse {
        id: milestone.id,
        project_id: milestone.project_id,
        name: milestone.name,
        category: milestone.category.to_value(),
        planned_date: milestone.planned_date,
        actual_date: milestone.actual_date,
        status: milestone.status.to_value(),
    }
}

fn update_to_response(row: milestone_updates::Model) -> MilestoneUpdateResponse {
    MilestoneUpdateResponse {
        id: row.id,
        milestone_id: row.milestone_id,
        status: row.status.to_value(),
        note: row.note,
        updated_by: row.updated_by,
        created_at: row.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /milestones?project_id=...
async fn list_milestones(
    State(state): State<AppState>,
    Query(query): Query<ListMilestonesQuery>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let Some(project_id) = (match parse_uuid_param(query.project_id, "project_id") {
        Ok(v) => v,
        Err(response) => return response,
    }) else {
        return missing_field("project_id");
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, false).await {
        return response;
    }

    let repo = MilestoneRepository::new((*state.db).clone());
    match repo.list_by_project(project_id).await {
        Ok(rows) => {
            let data: Vec<MilestoneResponse> =
                rows.into_iter().map(milestone_to_response).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /milestones
async fn create_milestone(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateMilestoneRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not create milestones",
        );
    }

    let Some(project_id) = payload.project_id else {
        return missing_field("project_id");
    };
    let Some(name) = payload.name.filter(|s| !s.trim().is_empty()) else {
        return missing_field("name");
    };
    let Some(category_raw) = payload.category.filter(|s| !s.is_empty()) else {
        return missing_field("category");
    };
    let Ok(category) = MilestoneCategory::try_from_value(&category_raw) else {
        return invalid_field("category", &category_raw);
    };
    let Some(planned_date) = payload.planned_date else {
        return missing_field("planned_date");
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let repo = MilestoneRepository::new((*state.db).clone());
    let input = CreateMilestoneInput {
        project_id,
        name,
        category,
        planned_date,
    };

    match repo.create(input).await {
        Ok(milestone) => {
            (StatusCode::CREATED, Json(milestone_to_response(milestone))).into_response()
        }
        Err(MilestoneError::ProjectNotFound(_)) => not_found("project"),
        Err(e) => internal_error(&e),
    }
}

/// GET /milestones/{milestone_id}
async fn get_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = MilestoneRepository::new((*state.db).clone());
    let milestone = match repo.find_by_id(milestone_id).await {
        Ok(Some(m)) => m,
        Ok(None) => return not_found("milestone"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, milestone.project_id, false).await
    {
        return response;
    }

    (StatusCode::OK, Json(milestone_to_response(milestone))).into_response()
}

/// PUT /milestones/{milestone_id}
async fn update_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateMilestoneRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not update milestones",
        );
    }

    let status = match payload.status {
        None => None,
        Some(s) => match MilestoneStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    let repo = MilestoneRepository::new((*state.db).clone());
    let input = UpdateMilestoneInput {
        name: payload.name,
        planned_date: payload.planned_date,
        actual_date: payload.actual_date,
        status,
    };

    match repo.update(milestone_id, input).await {
        Ok(milestone) => (StatusCode::OK, Json(milestone_to_response(milestone))).into_response(),
        Err(MilestoneError::NotFound(_)) => not_found("milestone"),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /milestones/{milestone_id}
async fn delete_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
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
            "Role may not delete milestones",
        );
    }

    let repo = MilestoneRepository::new((*state.db).clone());
    match repo.delete(milestone_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("milestone"),
        Err(e) => internal_error(&e),
    }
}

/// GET /milestones/{milestone_id}/updates
async fn list_updates(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = MilestoneRepository::new((*state.db).clone());
    let milestone = match repo.find_by_id(milestone_id).await {
        Ok(Some(m)) => m,
        Ok(None) => return not_found("milestone"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, milestone.project_id, false).await
    {
        return response;
    }

    match repo.list_updates(milestone_id).await {
        Ok(rows) => {
            let data: Vec<MilestoneUpdateResponse> =
                rows.into_iter().map(update_to_response).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /milestones/{milestone_id}/updates
async fn add_update(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<AddUpdateRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_file_progress_reports() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not record milestone updates",
        );
    }

    let Some(status_raw) = payload.status.filter(|s| !s.is_empty()) else {
        return missing_field("status");
    };
    let Ok(status) = MilestoneStatus::try_from_value(&status_raw) else {
        return invalid_field("status", &status_raw);
    };

    let repo = MilestoneRepository::new((*state.db).clone());
    let milestone = match repo.find_by_id(milestone_id).await {
        Ok(Some(m)) => m,
        Ok(None) => return not_found("milestone"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, milestone.project_id, true).await
    {
        return response;
    }

    let input = CreateMilestoneUpdateInput {
        status,
        note: payload.note,
        updated_by: Some(auth_user.user_id()),
    };

    match repo.add_update(milestone_id, input).await {
        Ok(row) => (StatusCode::CREATED, Json(update_to_response(row))).into_response(),
        Err(MilestoneError::NotFound(_)) => not_found("milestone"),
        Err(e) => internal_error(&e),
    }
}
