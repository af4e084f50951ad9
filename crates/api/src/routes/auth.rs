//! Authentication routes for login, token refresh, and logout.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::AppState;
use crate::routes::support::{error_response, internal_error};
use trakim_core::auth::verify_password;
use trakim_db::{SessionRepository, UserRepository};
use trakim_shared::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, TokenPair, UserInfo,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// POST /auth/login - Authenticate a user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid email or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error(&e);
        }
    };

    if !user.is_active {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "This account has been disabled",
        );
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid email or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error(&e);
        }
    }

    let role = user.role.to_string();
    let access_token = match state.jwt_service.generate_access_token(user.id, &role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error(&e);
        }
    };

    let refresh_token = SessionRepository::generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());

    let session_repo = SessionRepository::new((*state.db).clone());
    if let Err(e) = session_repo
        .create(user.id, &refresh_token, expires_at, None, None)
        .await
    {
        error!(error = %e, "Failed to create session");
        return internal_error(&e);
    }

    info!(user_id = %user.id, "User logged in");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/refresh - Exchange a refresh token for a new access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    let session = match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unknown or revoked refresh token",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error(&e);
        }
    };

    if session.expires_at < Utc::now() {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Refresh token has expired",
        );
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_id(session.user_id).await {
        Ok(Some(u)) if u.is_active => u,
        Ok(_) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Account is no longer active",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error(&e);
        }
    };

    let access_token = match state
        .jwt_service
        .generate_access_token(user.id, &user.role.to_string())
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error(&e);
        }
    };

    let response = TokenPair {
        access_token,
        refresh_token: payload.refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/logout - Revoke a refresh token.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(_) => (StatusCode::NO_CONTENT, ()).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to revoke session");
            internal_error(&e)
        }
    }
}
