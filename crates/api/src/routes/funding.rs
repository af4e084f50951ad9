//! Project funding routes, including drawdown transactions.

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
use uuid::Uuid;

use crate::routes::support::{
    ensure_project_access, error_response, internal_error, invalid_field, missing_field,
    non_empty, not_found, parse_uuid_param, require_role,
};
use crate::{AppState, middleware::AuthUser};
use trakim_core::reports::aggregate::percentage;
use trakim_db::{
    FundingRepository,
    entities::{
        funding_transactions, project_funding,
        sea_orm_active_enums::{FundingStatus, FundingTransactionType},
    },
    repositories::{
        CreateFundingInput, CreateTransactionInput, FundingError, FundingFilter,
        UpdateFundingInput,
    },
};
use trakim_shared::types::{PageRequest, PageResponse};

/// Creates the funding routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/funding", get(list_funding))
        .route("/funding", post(create_funding))
        .route("/funding/{funding_id}", get(get_funding))
        .route("/funding/{funding_id}", put(update_funding))
        .route("/funding/{funding_id}", delete(delete_funding))
        .route("/funding/{funding_id}/transactions", get(list_transactions))
        .route("/funding/{funding_id}/transactions", post(add_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing funding records.
#[derive(Debug, Deserialize)]
pub struct ListFundingQuery {
    /// Project filter.
    pub project_id: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Fiscal year filter.
    pub fiscal_year: Option<i32>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for creating a funding record.
#[derive(Debug, Deserialize)]
pub struct CreateFundingRequest {
    /// Owning project.
    pub project_id: Option<Uuid>,
    /// Funding source.
    pub funding_source: Option<String>,
    /// Budget allocated.
    pub budget_allocated: Option<Decimal>,
    /// Initial status.
    pub status: Option<String>,
    /// Fiscal year.
    pub fiscal_year: Option<i32>,
}

/// Request body for a partial funding update.
#[derive(Debug, Deserialize)]
pub struct UpdateFundingRequest {
    /// New funding source.
    pub funding_source: Option<String>,
    /// New allocated budget.
    pub budget_allocated: Option<Decimal>,
    /// New status.
    pub status: Option<String>,
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct AddTransactionRequest {
    /// Transaction type (`release`, `expenditure`, `commitment`,
    /// `adjustment`).
    pub transaction_type: Option<String>,
    /// Amount (positive).
    pub amount: Option<Decimal>,
    /// Transaction date.
    pub transaction_date: Option<chrono::NaiveDate>,
    /// External reference.
    pub reference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Response for a funding record.
#[derive(Debug, Serialize)]
pub struct FundingResponse {
    /// Funding record ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Funding source.
    pub funding_source: String,
    /// Budget allocated.
    pub budget_allocated: Decimal,
    /// Funds released.
    pub funds_released: Decimal,
    /// Funds utilized.
    pub funds_utilized: Decimal,
    /// Funds committed.
    pub funds_committed: Decimal,
    /// `utilized / allocated × 100`.
    pub utilization_rate_pct: Decimal,
    /// Status (wire vocabulary).
    pub status: String,
    /// Fiscal year.
    pub fiscal_year: i32,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Funding record ID.
    pub funding_id: Uuid,
    /// Transaction type (wire vocabulary).
    pub transaction_type: String,
    /// Amount.
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: chrono::NaiveDate,
    /// External reference.
    pub reference: Option<String>,
    /// Description.
    pub description: Option<String>,
}

fn funding_to_response(funding: project_funding::Model) -> FundingResponse {
    FundingResponse {
        id: funding.id,
        project_id: funding.project_id,
        utilization_rate_pct: percentage(funding.funds_utilized, funding.budget_allocated),
        funding_source: funding.funding_source,
        budget_allocated: funding.budget_allocated,
        funds_released: funding.funds_released,
        funds_utilized: funding.funds_utilized,
        funds_committed: funding.funds_committed,
        status: funding.status.to_value(),
        fiscal_year: funding.fiscal_year,
    }
}

fn transaction_to_response(row: funding_transactions::Model) -> TransactionResponse {
    TransactionResponse {
        id: row.id,
        funding_id: row.funding_id,
        transaction_type: row.transaction_type.to_value(),
        amount: row.amount,
        transaction_date: row.transaction_date,
        reference: row.reference,
        description: row.description,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /funding
async fn list_funding(
    State(state): State<AppState>,
    Query(query): Query<ListFundingQuery>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let project_id = match parse_uuid_param(query.project_id, "project_id") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let status = match non_empty(query.status) {
        None => None,
        Some(s) => match FundingStatus::try_from_value(&s) {
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

    let repo = FundingRepository::new((*state.db).clone());
    let filter = FundingFilter {
        project_id,
        status,
        fiscal_year: query.fiscal_year,
    };

    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data: Vec<FundingResponse> = rows.into_iter().map(funding_to_response).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /funding
async fn create_funding(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateFundingRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not manage funding",
        );
    }

    let Some(project_id) = payload.project_id else {
        return missing_field("project_id");
    };
    let Some(funding_source) = payload.funding_source.filter(|s| !s.trim().is_empty()) else {
        return missing_field("funding_source");
    };
    let Some(fiscal_year) = payload.fiscal_year else {
        return missing_field("fiscal_year");
    };

    let status = match payload.status {
        None => None,
        Some(s) => match FundingStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    let repo = FundingRepository::new((*state.db).clone());
    let input = CreateFundingInput {
        project_id,
        funding_source,
        budget_allocated: payload.budget_allocated.unwrap_or(Decimal::ZERO),
        status,
        fiscal_year,
    };

    match repo.create(input).await {
        Ok(funding) => (StatusCode::CREATED, Json(funding_to_response(funding))).into_response(),
        Err(FundingError::ProjectNotFound(_)) => not_found("project"),
        Err(e) => internal_error(&e),
    }
}

/// GET /funding/{funding_id}
async fn get_funding(
    State(state): State<AppState>,
    Path(funding_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = FundingRepository::new((*state.db).clone());
    let funding = match repo.find_by_id(funding_id).await {
        Ok(Some(f)) => f,
        Ok(None) => return not_found("funding record"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, funding.project_id, false).await
    {
        return response;
    }

    (StatusCode::OK, Json(funding_to_response(funding))).into_response()
}

/// PUT /funding/{funding_id}
async fn update_funding(
    State(state): State<AppState>,
    Path(funding_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateFundingRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not manage funding",
        );
    }

    let status = match payload.status {
        None => None,
        Some(s) => match FundingStatus::try_from_value(&s) {
            Ok(parsed) => Some(parsed),
            Err(_) => return invalid_field("status", &s),
        },
    };

    let repo = FundingRepository::new((*state.db).clone());
    let input = UpdateFundingInput {
        funding_source: payload.funding_source,
        budget_allocated: payload.budget_allocated,
        status,
    };

    match repo.update(funding_id, input).await {
        Ok(funding) => (StatusCode::OK, Json(funding_to_response(funding))).into_response(),
        Err(FundingError::NotFound(_)) => not_found("funding record"),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /funding/{funding_id}
async fn delete_funding(
    State(state): State<AppState>,
    Path(funding_id): Path<Uuid>,
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
            "Role may not manage funding",
        );
    }

    let repo = FundingRepository::new((*state.db).clone());
    match repo.delete(funding_id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => not_found("funding record"),
        Err(e) => internal_error(&e),
    }
}

/// GET /funding/{funding_id}/transactions
async fn list_transactions(
    State(state): State<AppState>,
    Path(funding_id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = FundingRepository::new((*state.db).clone());
    let funding = match repo.find_by_id(funding_id).await {
        Ok(Some(f)) => f,
        Ok(None) => return not_found("funding record"),
        Err(e) => return internal_error(&e),
    };

    if let Err(response) =
        ensure_project_access(&state, &auth_user, funding.project_id, false).await
    {
        return response;
    }

    match repo.list_transactions(funding_id).await {
        Ok(rows) => {
            let data: Vec<TransactionResponse> =
                rows.into_iter().map(transaction_to_response).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// POST /funding/{funding_id}/transactions
async fn add_transaction(
    State(state): State<AppState>,
    Path(funding_id): Path<Uuid>,
    auth_user: AuthUser,
    Json(payload): Json<AddTransactionRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if !role.can_manage_projects() {
        return error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Role may not record funding transactions",
        );
    }

    let Some(type_raw) = payload.transaction_type.filter(|s| !s.is_empty()) else {
        return missing_field("transaction_type");
    };
    let Ok(transaction_type) = FundingTransactionType::try_from_value(&type_raw) else {
        return invalid_field("transaction_type", &type_raw);
    };
    let Some(amount) = payload.amount else {
        return missing_field("amount");
    };
    let Some(transaction_date) = payload.transaction_date else {
        return missing_field("transaction_date");
    };

    let repo = FundingRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        transaction_type,
        amount,
        transaction_date,
        reference: payload.reference,
        description: payload.description,
    };

    match repo.add_transaction(funding_id, input).await {
        Ok(row) => (StatusCode::CREATED, Json(transaction_to_response(row))).into_response(),
        Err(FundingError::NotFound(_)) => not_found("funding record"),
        Err(FundingError::NonPositiveAmount(amount)) => error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("amount must be positive, got {amount}"),
        ),
        Err(e) => internal_error(&e),
    }
}
