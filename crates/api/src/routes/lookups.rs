//! Reference-data lookup routes, backed by the cached lookup service.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;

use crate::routes::support::{error_response, internal_error, require_role};
use crate::{AppState, middleware::AuthUser};

/// Creates the lookup routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lookups", get(get_lookups))
        .route("/lookups/refresh", post(refresh_lookups))
}

/// GET /lookups - Provinces and enum vocabularies, cached.
async fn get_lookups(State(state): State<AppState>, _auth_user: AuthUser) -> impl IntoResponse {
    match state.lookups.get().await {
        Ok(data) => (StatusCode::OK, Json(data.as_ref().clone())).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// POST /lookups/refresh - Drop the cache and reload (admin only).
async fn refresh_lookups(State(state): State<AppState>, auth_user: AuthUser) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_administer() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Only admins may refresh reference data",
        );
    }

    match state.lookups.refresh().await {
        Ok(data) => {
            info!("Lookup reference data refreshed");
            (StatusCode::OK, Json(data.as_ref().clone())).into_response()
        }
        Err(e) => internal_error(&e),
    }
}
