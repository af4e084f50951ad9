//! First-run setup: create the initial admin account.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use crate::routes::support::{error_response, internal_error, missing_field};
use trakim_core::auth::{MIN_PASSWORD_LEN, hash_password};
use trakim_db::{
    UserRepository, entities::sea_orm_active_enums::UserRole, repositories::CreateUserInput,
};

/// Creates the setup router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/setup/create-admin", post(create_admin))
}

/// Request body for creating the initial admin.
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    /// Admin full name.
    pub name: Option<String>,
    /// Admin email.
    pub email: Option<String>,
    /// Admin password (min 8 characters).
    pub password: Option<String>,
}

/// POST /setup/create-admin
///
/// Only available while no admin account exists.
async fn create_admin(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdminRequest>,
) -> impl IntoResponse {
    let Some(name) = payload.name.filter(|s| !s.trim().is_empty()) else {
        return missing_field("name");
    };
    let Some(email) = payload.email.filter(|s| !s.trim().is_empty()) else {
        return missing_field("email");
    };
    let Some(password) = payload.password.filter(|s| !s.is_empty()) else {
        return missing_field("password");
    };

    if password.len() < MIN_PASSWORD_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.count_admins().await {
        Ok(0) => {}
        Ok(_) => {
            return error_response(
                StatusCode::FORBIDDEN,
                "forbidden",
                "An admin account already exists",
            );
        }
        Err(e) => {
            error!(error = %e, "Failed to count admins");
            return internal_error(&e);
        }
    }

    match user_repo.email_exists(&email).await {
        Ok(false) => {}
        Ok(true) => {
            return error_response(
                StatusCode::CONFLICT,
                "conflict",
                "email already registered",
            );
        }
        Err(e) => {
            error!(error = %e, "Failed to check email");
            return internal_error(&e);
        }
    }

    let password_hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error(&e);
        }
    };

    let user = match user_repo
        .create(CreateUserInput {
            email,
            password_hash,
            full_name: name,
            role: UserRole::Admin,
        })
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create admin");
            return internal_error(&e);
        }
    };

    info!(user_id = %user.id, "Initial admin created");

    (StatusCode::CREATED, Json(user)).into_response()
}
