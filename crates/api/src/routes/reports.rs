//! Report routes.
//!
//! One endpoint serves all six report types. The response envelope is
//! `{report_type, generated_at, filters, data}`; `generated_at` lives in
//! the envelope so `data` stays deterministic for identical filters.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::routes::support::{
    ensure_project_access, internal_error, invalid_field, missing_field, non_empty,
    parse_date_param, parse_uuid_param,
};
use crate::{AppState, middleware::AuthUser};
use trakim_core::reports::export::{self, ExportError};
use trakim_core::reports::types::{
    ContractorReport, FinancialReport, GpsReport, OverviewReport, ProgressReport, ProvinceReport,
};
use trakim_core::reports::{ReportFilter, ReportKind, ReportService};
use trakim_db::{ReportRepository, repositories::ReportError};

/// Creates the report routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports", get(generate_report))
}

// ============================================================================
// Query Parameters and Envelope
// ============================================================================

/// Query parameters for report generation.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Report type (required).
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    /// Project filter.
    pub project_id: Option<String>,
    /// Section filter.
    pub section_id: Option<String>,
    /// Province filter.
    pub province_id: Option<String>,
    /// Contractor filter.
    pub contractor_id: Option<String>,
    /// Status filter (entity-specific vocabulary).
    pub status: Option<String>,
    /// Inclusive start of the date window.
    pub start_date: Option<String>,
    /// Inclusive end of the date window.
    pub end_date: Option<String>,
    /// Cap on itemized rows (default 50).
    pub limit: Option<u64>,
    /// Output format: `json` (default) or `csv`.
    pub format: Option<String>,
}

/// Report response envelope.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope {
    /// Report type (wire vocabulary).
    pub report_type: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The filters that were applied.
    pub filters: ReportFilter,
    /// The assembled report.
    pub data: serde_json::Value,
}

// ============================================================================
// Handler
// ============================================================================

/// GET /reports?type=...
#[allow(clippy::too_many_lines)]
async fn generate_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    auth_user: AuthUser,
) -> Response {
    let Some(kind_raw) = non_empty(query.report_type) else {
        return missing_field("type");
    };
    let Ok(kind) = kind_raw.parse::<ReportKind>() else {
        return invalid_field("type", &kind_raw);
    };

    let project_id = match parse_uuid_param(query.project_id, "project_id") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let section_id = match parse_uuid_param(query.section_id, "section_id") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let province_id = match parse_uuid_param(query.province_id, "province_id") {
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

    if let Some(project_id) = project_id
        && let Err(response) = ensure_project_access(&state, &auth_user, project_id, false).await
    {
        return response;
    }

    let csv_requested = match non_empty(query.format).as_deref() {
        None | Some("json") => false,
        Some("csv") => true,
        Some(other) => return invalid_field("format", other),
    };

    let mut builder = ReportFilter::builder();
    if let Some(id) = project_id {
        builder = builder.project_id(id);
    }
    if let Some(id) = section_id {
        builder = builder.section_id(id);
    }
    if let Some(id) = province_id {
        builder = builder.province_id(id);
    }
    if let Some(id) = contractor_id {
        builder = builder.contractor_id(id);
    }
    if let Some(status) = non_empty(query.status) {
        builder = builder.status(status);
    }
    if let Some(date) = start_date {
        builder = builder.start_date(date);
    }
    if let Some(date) = end_date {
        builder = builder.end_date(date);
    }
    if let Some(limit) = query.limit {
        builder = builder.limit(limit);
    }
    let filter = builder.build();

    let repo = ReportRepository::new((*state.db).clone());

    match kind {
        ReportKind::Overview => match build_overview(&repo, &filter).await {
            Ok(report) => render(kind, &filter, csv_requested, &report, export::overview_csv),
            Err(e) => report_error(&e),
        },
        ReportKind::Progress => match build_progress(&repo, &filter).await {
            Ok(report) => render(kind, &filter, csv_requested, &report, export::progress_csv),
            Err(e) => report_error(&e),
        },
        ReportKind::Contractor => match build_contractor(&repo, &filter).await {
            Ok(report) => render(kind, &filter, csv_requested, &report, export::contractor_csv),
            Err(e) => report_error(&e),
        },
        ReportKind::Province => match build_province(&repo, &filter).await {
            Ok(report) => render(kind, &filter, csv_requested, &report, export::province_csv),
            Err(e) => report_error(&e),
        },
        ReportKind::Gps => match build_gps(&repo, &filter).await {
            Ok(report) => render(kind, &filter, csv_requested, &report, export::gps_csv),
            Err(e) => report_error(&e),
        },
        ReportKind::Financial => match build_financial(&repo, &filter).await {
            Ok(report) => render(kind, &filter, csv_requested, &report, export::financial_csv),
            Err(e) => report_error(&e),
        },
    }
}

// ============================================================================
// Per-Kind Assembly
// ============================================================================

async fn build_overview(
    repo: &ReportRepository,
    filter: &ReportFilter,
) -> Result<OverviewReport, ReportError> {
    let projects = repo.fetch_projects(filter).await?;
    let sections = repo.fetch_sections(filter).await?;
    let contractors = repo.fetch_contractors(filter).await?;
    let quality = repo.fetch_quality_reports(filter).await?;

    Ok(ReportService::generate_overview(
        projects,
        &sections,
        &contractors,
        &quality,
        filter.item_limit(),
    ))
}

async fn build_progress(
    repo: &ReportRepository,
    filter: &ReportFilter,
) -> Result<ProgressReport, ReportError> {
    let sections = repo.fetch_sections(filter).await?;
    let reports = repo.fetch_progress_reports(filter).await?;

    Ok(ReportService::generate_progress(
        &sections,
        reports,
        filter.item_limit(),
    ))
}

async fn build_contractor(
    repo: &ReportRepository,
    filter: &ReportFilter,
) -> Result<ContractorReport, ReportError> {
    let contractors = repo.fetch_contractors(filter).await?;
    let assignments = repo.fetch_assignments(filter).await?;

    Ok(ReportService::generate_contractor(
        contractors,
        &assignments,
        filter.item_limit(),
    ))
}

async fn build_province(
    repo: &ReportRepository,
    filter: &ReportFilter,
) -> Result<ProvinceReport, ReportError> {
    let projects = repo.fetch_projects(filter).await?;
    let sections = repo.fetch_sections(filter).await?;

    Ok(ReportService::generate_province(
        &projects,
        &sections,
        filter.item_limit(),
    ))
}

async fn build_gps(
    repo: &ReportRepository,
    filter: &ReportFilter,
) -> Result<GpsReport, ReportError> {
    let points = repo.fetch_gps_points(filter).await?;
    Ok(ReportService::generate_gps(points, filter.item_limit()))
}

async fn build_financial(
    repo: &ReportRepository,
    filter: &ReportFilter,
) -> Result<FinancialReport, ReportError> {
    let records = repo.fetch_funding(filter).await?;
    Ok(ReportService::generate_financial(
        records,
        filter.item_limit(),
    ))
}

// ============================================================================
// Rendering
// ============================================================================

fn render<T: Serialize>(
    kind: ReportKind,
    filter: &ReportFilter,
    csv_requested: bool,
    report: &T,
    csv_fn: fn(&T) -> Result<String, ExportError>,
) -> Response {
    if csv_requested {
        return match csv_fn(report) {
            Ok(body) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{kind}-report.csv\""),
                    ),
                ],
                body,
            )
                .into_response(),
            Err(e) => {
                error!(error = %e, "CSV export failed");
                internal_error(&e)
            }
        };
    }

    match serde_json::to_value(report) {
        Ok(data) => {
            let envelope = ReportEnvelope {
                report_type: kind.to_string(),
                generated_at: Utc::now(),
                filters: filter.clone(),
                data,
            };
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Report serialization failed");
            internal_error(&e)
        }
    }
}

fn report_error(e: &ReportError) -> Response {
    match e {
        ReportError::InvalidStatus { value, .. } => invalid_field("status", value),
        ReportError::Database(_) => internal_error(e),
    }
}
