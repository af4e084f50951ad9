//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Variants map one-to-one onto the HTTP error taxonomy: validation (400),
/// authentication (401), authorization (403), missing entities (404),
/// unique-constraint conflicts (409), and store/internal failures (500).
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication failed or credential absent.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Insufficient role or missing project grant.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique-constraint violation (e.g. duplicate email or license number).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the short error code used in API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
