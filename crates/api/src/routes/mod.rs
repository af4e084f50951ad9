//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod contractors;
pub mod dashboard;
pub mod funding;
pub mod gps_points;
pub mod health;
pub mod lookups;
pub mod milestones;
pub mod progress_reports;
pub mod projects;
pub mod quality_reports;
pub mod reports;
pub mod setup;

mod support;

/// Creates the API router with protected routes that need state for
/// middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(projects::routes())
        .merge(contractors::routes())
        .merge(gps_points::routes())
        .merge(quality_reports::routes())
        .merge(milestones::routes())
        .merge(progress_reports::routes())
        .merge(funding::routes())
        .merge(reports::routes())
        .merge(dashboard::routes())
        .merge(lookups::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(setup::routes())
        .merge(protected_routes)
}
