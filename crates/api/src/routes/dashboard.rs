//! Dashboard summary cards.
//!
//! Serves the headline numbers the dashboard renders: status breakdown,
//! weighted progress, budget utilization, quality pass rate, and the last
//! fortnight of GPS field activity, scoped to the caller's projects.

use std::collections::BTreeMap;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::routes::support::{internal_error, require_role};
use crate::{AppState, middleware::AuthUser};
use trakim_core::reports::ReportFilter;
use trakim_core::reports::aggregate::{count_by, daily_activity, percentage, rate};
use trakim_core::reports::types::SectionRow;
use trakim_db::{ReportRepository, UserRepository};

/// How many days of field activity the dashboard shows.
const ACTIVITY_WINDOW_DAYS: i64 = 14;

/// Creates the dashboard routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// Dashboard response.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Number of projects visible to the caller.
    pub total_projects: u64,
    /// Project count per status.
    pub projects_by_status: BTreeMap<String, u64>,
    /// Total road distance in kilometres.
    pub total_distance_km: Decimal,
    /// Length-weighted overall progress percentage.
    pub overall_progress_pct: Decimal,
    /// Total budget allocated across sections.
    pub budget_allocated: Decimal,
    /// Total budget spent across sections.
    pub budget_spent: Decimal,
    /// Budget utilization percentage.
    pub budget_utilization_pct: Decimal,
    /// QA/QC pass rate percentage.
    pub quality_pass_rate_pct: Decimal,
    /// GPS points logged per day over the activity window.
    pub recent_activity: BTreeMap<NaiveDate, u64>,
}

/// GET /dashboard
async fn get_dashboard(State(state): State<AppState>, auth_user: AuthUser) -> impl IntoResponse {
    let role = match require_role(&auth_user) {
        Ok(r) => r,
        Err(response) => return response,
    };

    // Non-global roles only see granted projects
    let visible: Option<Vec<Uuid>> = if role.has_global_project_access() {
        None
    } else {
        let user_repo = UserRepository::new((*state.db).clone());
        match user_repo.accessible_project_ids(auth_user.user_id()).await {
            Ok(ids) => Some(ids),
            Err(e) => return internal_error(&e),
        }
    };

    let repo = ReportRepository::new((*state.db).clone());
    let everything = ReportFilter::builder().build();

    let mut projects = match repo.fetch_projects(&everything).await {
        Ok(rows) => rows,
        Err(e) => return internal_error(&e),
    };
    let mut sections = match repo.fetch_sections(&everything).await {
        Ok(rows) => rows,
        Err(e) => return internal_error(&e),
    };
    let mut quality = match repo.fetch_quality_reports(&everything).await {
        Ok(rows) => rows,
        Err(e) => return internal_error(&e),
    };

    let today = Utc::now().date_naive();
    let activity_filter = ReportFilter::builder()
        .start_date(today - Duration::days(ACTIVITY_WINDOW_DAYS - 1))
        .end_date(today)
        .build();
    let mut points = match repo.fetch_gps_points(&activity_filter).await {
        Ok(rows) => rows,
        Err(e) => return internal_error(&e),
    };

    if let Some(ids) = &visible {
        projects.retain(|p| ids.contains(&p.id));
        sections.retain(|s| ids.contains(&s.project_id));
        quality.retain(|q| ids.contains(&q.project_id));
        points.retain(|p| ids.contains(&p.project_id));
    }

    let total_distance_m: Decimal = projects.iter().map(|p| p.total_distance_m).sum();
    let budget_allocated: Decimal = sections.iter().map(|s| s.budget_allocated).sum();
    let budget_spent: Decimal = sections.iter().map(|s| s.budget_spent).sum();
    let passes = quality
        .iter()
        .filter(|q| q.qa_qc_status == "pass")
        .count() as u64;
    let timestamps: Vec<_> = points.iter().map(|p| p.recorded_at).collect();

    let response = DashboardResponse {
        total_projects: projects.len() as u64,
        projects_by_status: count_by(&projects, |p| p.status.clone()),
        total_distance_km: total_distance_m / Decimal::from(1000),
        overall_progress_pct: weighted_over_sections(&sections),
        budget_allocated,
        budget_spent,
        budget_utilization_pct: percentage(budget_spent, budget_allocated),
        quality_pass_rate_pct: rate(passes, quality.len() as u64),
        recent_activity: daily_activity(&timestamps),
    };

    (StatusCode::OK, Json(response)).into_response()
}

fn weighted_over_sections(sections: &[SectionRow]) -> Decimal {
    let entries: Vec<trakim_core::reports::WeightedEntry> = sections
        .iter()
        .map(|s| trakim_core::reports::WeightedEntry {
            weight: s.length_m,
            value: s.progress_pct,
        })
        .collect();
    trakim_core::reports::aggregate::weighted_mean(&entries)
}
