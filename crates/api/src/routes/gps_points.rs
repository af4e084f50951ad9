//! GPS point routes for the field log.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
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
    GpsRepository,
    entities::{
        gps_points,
        sea_orm_active_enums::{PointStatus, RoadSide, WorkPhase},
    },
    repositories::{CreateGpsPointInput, GpsError, GpsFilter},
};
use trakim_shared::types::{PageRequest, PageResponse};

/// Creates the GPS point routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gps-points", get(list_points))
        .route("/gps-points", post(create_point))
        .route("/gps-points/{point_id}", get(get_point))
        .route("/gps-points/{point_id}", delete(delete_point))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing GPS points.
#[derive(Debug, Deserialize)]
pub struct ListPointsQuery {
    /// Project filter.
    pub project_id: Option<String>,
    /// Section filter.
    pub section_id: Option<String>,
    /// Contractor filter.
    pub contractor_id: Option<String>,
    /// Phase filter.
    pub phase: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Inclusive start of the `recorded_at` window.
    pub start_date: Option<String>,
    /// Inclusive end of the `recorded_at` window.
    pub end_date: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for logging a GPS point.
#[derive(Debug, Deserialize)]
pub struct CreatePointRequest {
    /// Owning project.
    pub project_id: Option<Uuid>,
    /// Section, if known.
    pub section_id: Option<Uuid>,
    /// Contractor performing the works.
    pub contractor_id: Option<Uuid>,
    /// Latitude in decimal degrees.
    pub latitude: Option<Decimal>,
    /// Longitude in decimal degrees.
    pub longitude: Option<Decimal>,
    /// Work phase (`drain`, `basket`, `sealing`).
    pub phase: Option<String>,
    /// Road side (`left`, `right`, `both`); defaults to both.
    pub road_side: Option<String>,
    /// Chainage distance in metres.
    pub distance_m: Option<Decimal>,
    /// Point status; defaults to planned.
    pub status: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Observation timestamp; defaults to now.
    pub recorded_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response for a GPS point.
#[derive(Debug, Serialize)]
pub struct GpsPointResponse {
    /// Point ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Section, if known.
    pub section_id: Option<Uuid>,
    /// Contractor, if known.
    pub contractor_id: Option<Uuid>,
    /// Recording user.
    pub recorded_by: Option<Uuid>,
    /// Latitude in decimal degrees.
    pub latitude: Decimal,
    /// Longitude in decimal degrees.
    pub longitude: Decimal,
    /// Work phase (wire vocabulary).
    pub phase: String,
    /// Road side (wire vocabulary).
    pub road_side: String,
    /// Chainage distance in metres.
    pub distance_m: Option<Decimal>,
    /// Point status (wire vocabulary).
    pub status: String,
    /// Note.
    pub note: Option<String>,
    /// Observation timestamp.
    pub recorded_at: String,
}

fn point_to_response(point: gps_points::Model) -> GpsPointResponse {
    GpsPointResponse {
        id: point.id,
        project_id: point.project_id,
        section_id: point.section_id,
        contractor_id: point.contractor_id,
        recorded_by: point.recorded_by,
        latitude: point.latitude,
        longitude: point.longitude,
        phase: point.phase.to_value(),
        road_side: point.road_side.to_value(),
        distance_m: point.distance_m,
        status: point.status.to_value(),
        note: point.note,
        recorded_at: point.recorded_at.to_rfc3339(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /gps-points
async fn list_points(
    State(state): State<AppState>,
    Query(query): Query<ListPointsQuery>,
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
    let contractor_id = match parse_uuid_param(query.contractor_id, "contractor_id") {
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

    let phase = match non_empty(query.phase) {
        None => None,
        Some(s) => match WorkPhase::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("phase", &s),
        },
    };
    let status = match non_empty(query.status) {
        None => None,
        Some(s) => match PointStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
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

    let repo = GpsRepository::new((*state.db).clone());
    let filter = GpsFilter {
        project_id,
        section_id,
        contractor_id,
        phase,
        status,
        start_date,
        end_date,
    };

    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data: Vec<GpsPointResponse> = rows.into_iter().map(point_to_response).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /gps-points
async fn create_point(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreatePointRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_log_gps_points() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not log GPS points",
        );
    }

    let Some(project_id) = payload.project_id else {
        return missing_field("project_id");
    };
    let Some(latitude) = payload.latitude else {
        return missing_field("latitude");
    };
    let Some(longitude) = payload.longitude else {
        return missing_field("longitude");
    };
    let Some(phase_raw) = payload.phase.filter(|s| !s.is_empty()) else {
        return missing_field("phase");
    };
    let Ok(phase) = WorkPhase::try_from_value(&phase_raw) else {
        return invalid_field("phase", &phase_raw);
    };

    let road_side = match payload.road_side {
        None => RoadSide::Both,
        Some(s) => match RoadSide::try_from_value(&s) {
            Ok(parsed) => parsed,
            Err(_) => return invalid_field("road_side", &s),
        },
    };
    let status = match payload.status {
        None => None,
        Some(s) => match PointStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, project_id, true).await {
        return response;
    }

    let repo = GpsRepository::new((*state.db).clone());
    let input = CreateGpsPointInput {
        project_id,
        section_id: payload.section_id,
        contractor_id: payload.contractor_id,
        recorded_by: Some(auth_user.user_id()),
        latitude,
        longitude,
        phase,
        road_side,
        distance_m: payload.distance_m,
        status,
        note: payload.note,
        recorded_at: payload.recorded_at,
    };

    match repo.create(input).await {
        Ok(point) => {
            info!(point_id = %point.id, project_id = %point.project_id, "GPS point logged");
            (StatusCode::CREATED, Json(point_to_response(point))).into_response()
        }
        Err(GpsError::ProjectNotFound(_)) => not_found("project"),
        Err(GpsError::CoordinateOutOfRange { latitude, longitude }) => error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("coordinates out of range: {latitude}, {longitude}"),
        ),
        Err(e) => internal_error(&e),
    }
}

/// GET /gps-points/{point_id}
async fn get_point(
    State(state): State<AppState>,
    Path(point_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = GpsRepository::new((*state.db).clone());
    let point = match repo.find_by_id(point_id).await {
        Ok(Some(p)) => p,
        Ok(None) => return not_found("gps point"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) = ensure_project_access(&state, &auth_user, point.project_id, false).await {
        return response;
    }

    (StatusCode::OK, Json(point_to_response(point))).into_response()
}

/// DELETE /gps-points/{point_id}
async fn delete_point(
    State(state): State<AppState>,
    Path(point_id): Path<Uuid>,
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
            "Role may not delete GPS points",
        );
    }

    let repo = GpsRepository::new((*state.db).clone());
    match repo.delete(point_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("gps point"),
        Err(e) => internal_error(&e),
    }
}
