//! Report repository: fetches the row sets the report assemblers fold.
//!
//! Each fetch applies the typed [`ReportFilter`] to its own entity, keying
//! date ranges on that entity's date column: `test_date` for quality
//! reports, `recorded_at` for GPS points, `report_date` for progress
//! reports, and `created_at` for projects and funding records. The
//! per-entity columns are deliberately not unified.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use uuid::Uuid;

use trakim_core::reports::ReportFilter;
use trakim_core::reports::types::{
    AssignmentRow, ContractorRow, FundingRow, GpsPointRow, ProgressRow, ProjectRow, QualityRow,
    SectionRow,
};

use crate::entities::{
    contractor_projects, contractors, gps_points, progress_reports, project_funding,
    project_sections, projects, quality_reports,
    sea_orm_active_enums::{
        ContractStatus, FundingStatus, PointStatus, ProjectStatus, QaQcStatus, ScheduleStatus,
    },
};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Status filter value not in the entity's vocabulary.
    #[error("Invalid {entity} status filter: {value}")]
    InvalidStatus {
        /// The rejected value.
        value: String,
        /// Which entity's vocabulary was consulted.
        entity: &'static str,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository for filtered row fetches.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches project rows for the overview and province reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the status filter is invalid or the query fails.
    pub async fn fetch_projects(&self, filter: &ReportFilter) -> Result<Vec<ProjectRow>, ReportError> {
        let mut query = projects::Entity::find();

        if let Some(project_id) = filter.project_id {
            query = query.filter(projects::Column::Id.eq(project_id));
        }
        if let Some(province_id) = filter.province_id {
            query = query.filter(projects::Column::ProvinceId.eq(province_id));
        }
        if let Some(status) = &filter.status {
            let status: ProjectStatus = parse_status(status, "project")?;
            query = query.filter(projects::Column::Status.eq(status));
        }
        query = apply_timestamp_window(query, projects::Column::CreatedAt, filter);

        let rows = query
            .find_also_related(crate::entities::provinces::Entity)
            .order_by_asc(projects::Column::Name)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(project, province)| ProjectRow {
                id: project.id,
                name: project.name,
                province: province.map_or_else(|| "Unknown".to_string(), |p| p.name),
                status: project.status.to_value(),
                total_distance_m: project.total_distance_m,
            })
            .collect())
    }

    /// Fetches section rows for progress and budget rollups.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn fetch_sections(&self, filter: &ReportFilter) -> Result<Vec<SectionRow>, ReportError> {
        let mut query = project_sections::Entity::find();

        if let Some(section_id) = filter.section_id {
            query = query.filter(project_sections::Column::Id.eq(section_id));
        }
        if let Some(contractor_id) = filter.contractor_id {
            query = query.filter(project_sections::Column::ContractorId.eq(contractor_id));
        }
        if let Some(ids) = self.project_scope(filter).await? {
            query = query.filter(project_sections::Column::ProjectId.is_in(ids));
        }

        let rows = query
            .order_by_asc(project_sections::Column::StartKm)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|section| SectionRow {
                id: section.id,
                project_id: section.project_id,
                name: section.name,
                length_m: section.length_m,
                progress_pct: section.progress_pct,
                budget_allocated: section.budget_allocated,
                budget_spent: section.budget_spent,
            })
            .collect())
    }

    /// Fetches contractor rows for the contractor report.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn fetch_contractors(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ContractorRow>, ReportError> {
        let mut query = contractors::Entity::find();

        if let Some(contractor_id) = filter.contractor_id {
            query = query.filter(contractors::Column::Id.eq(contractor_id));
        }

        let rows = query
            .order_by_asc(contractors::Column::Name)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|contractor| ContractorRow {
                id: contractor.id,
                name: contractor.name,
                license_number: contractor.license_number,
                certification_level: contractor.certification_level.to_value(),
                is_active: contractor.is_active,
            })
            .collect())
    }

    /// Fetches assignment rows for the contractor report.
    ///
    /// # Errors
    ///
    /// Returns an error if the status filter is invalid or the query fails.
    pub async fn fetch_assignments(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<AssignmentRow>, ReportError> {
        let mut query = contractor_projects::Entity::find();

        if let Some(contractor_id) = filter.contractor_id {
            query = query.filter(contractor_projects::Column::ContractorId.eq(contractor_id));
        }
        if let Some(status) = &filter.status {
            let status: ContractStatus = parse_status(status, "contract")?;
            query = query.filter(contractor_projects::Column::ContractStatus.eq(status));
        }
        if let Some(ids) = self.project_scope(filter).await? {
            query = query.filter(contractor_projects::Column::ProjectId.is_in(ids));
        }

        let rows = query.all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|assignment| AssignmentRow {
                contractor_id: assignment.contractor_id,
                project_id: assignment.project_id,
                contract_value: assignment.contract_value,
                contract_status: assignment.contract_status.to_value(),
                performance_rating: assignment.performance_rating,
            })
            .collect())
    }

    /// Fetches GPS point rows; the date window keys on `recorded_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the status filter is invalid or the query fails.
    pub async fn fetch_gps_points(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<GpsPointRow>, ReportError> {
        let mut query = gps_points::Entity::find();

        if let Some(section_id) = filter.section_id {
            query = query.filter(gps_points::Column::SectionId.eq(section_id));
        }
        if let Some(contractor_id) = filter.contractor_id {
            query = query.filter(gps_points::Column::ContractorId.eq(contractor_id));
        }
        if let Some(status) = &filter.status {
            let status: PointStatus = parse_status(status, "gps point")?;
            query = query.filter(gps_points::Column::Status.eq(status));
        }
        if let Some(ids) = self.project_scope(filter).await? {
            query = query.filter(gps_points::Column::ProjectId.is_in(ids));
        }
        query = apply_timestamp_window(query, gps_points::Column::RecordedAt, filter);

        let rows = query
            .order_by_asc(gps_points::Column::RecordedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|point| GpsPointRow {
                id: point.id,
                project_id: point.project_id,
                latitude: point.latitude,
                longitude: point.longitude,
                phase: point.phase.to_value(),
                road_side: point.road_side.to_value(),
                status: point.status.to_value(),
                distance_m: point.distance_m,
                recorded_at: point.recorded_at.with_timezone(&Utc),
            })
            .collect())
    }

    /// Fetches progress report rows; the date window keys on `report_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the status filter is invalid or the query fails.
    pub async fn fetch_progress_reports(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ProgressRow>, ReportError> {
        let mut query = progress_reports::Entity::find();

        if let Some(section_id) = filter.section_id {
            query = query.filter(progress_reports::Column::SectionId.eq(section_id));
        }
        if let Some(status) = &filter.status {
            let status: ScheduleStatus = parse_status(status, "schedule")?;
            query = query.filter(progress_reports::Column::ScheduleStatus.eq(status));
        }
        if let Some(ids) = self.project_scope(filter).await? {
            query = query.filter(progress_reports::Column::ProjectId.is_in(ids));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(progress_reports::Column::ReportDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(progress_reports::Column::ReportDate.lte(end));
        }

        let rows = query
            .find_also_related(projects::Entity)
            .order_by_desc(progress_reports::Column::ReportDate)
            .all(&self.db)
            .await?;

        let section_names = self
            .section_names(rows.iter().filter_map(|(r, _)| r.section_id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(report, project)| ProgressRow {
                id: report.id,
                project_id: report.project_id,
                project: project.map_or_else(|| "Unknown".to_string(), |p| p.name),
                section: report
                    .section_id
                    .and_then(|id| section_names.get(&id).cloned()),
                report_date: report.report_date,
                current_progress: report.current_progress,
                previous_progress: report.previous_progress,
                planned_progress: report.planned_progress,
                schedule_status: report.schedule_status.to_value(),
            })
            .collect())
    }

    /// Fetches quality report rows; the date window keys on `test_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the status filter is invalid or the query fails.
    pub async fn fetch_quality_reports(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<QualityRow>, ReportError> {
        let mut query = quality_reports::Entity::find();

        if let Some(section_id) = filter.section_id {
            query = query.filter(quality_reports::Column::SectionId.eq(section_id));
        }
        if let Some(status) = &filter.status {
            let status: QaQcStatus = parse_status(status, "qa/qc")?;
            query = query.filter(quality_reports::Column::QaQcStatus.eq(status));
        }
        if let Some(ids) = self.project_scope(filter).await? {
            query = query.filter(quality_reports::Column::ProjectId.is_in(ids));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(quality_reports::Column::TestDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(quality_reports::Column::TestDate.lte(end));
        }

        let rows = query
            .order_by_desc(quality_reports::Column::TestDate)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|report| QualityRow {
                id: report.id,
                project_id: report.project_id,
                report_type: report.report_type.to_value(),
                test_date: report.test_date,
                qa_qc_status: report.qa_qc_status.to_value(),
            })
            .collect())
    }

    /// Fetches funding rows; the date window keys on `created_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the status filter is invalid or the query fails.
    pub async fn fetch_funding(&self, filter: &ReportFilter) -> Result<Vec<FundingRow>, ReportError> {
        let mut query = project_funding::Entity::find();

        if let Some(status) = &filter.status {
            let status: FundingStatus = parse_status(status, "funding")?;
            query = query.filter(project_funding::Column::Status.eq(status));
        }
        if let Some(ids) = self.project_scope(filter).await? {
            query = query.filter(project_funding::Column::ProjectId.is_in(ids));
        }
        query = apply_timestamp_window(query, project_funding::Column::CreatedAt, filter);

        let rows = query
            .find_also_related(projects::Entity)
            .order_by_desc(project_funding::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(funding, project)| FundingRow {
                id: funding.id,
                project_id: funding.project_id,
                project: project.map_or_else(|| "Unknown".to_string(), |p| p.name),
                funding_source: funding.funding_source,
                budget_allocated: funding.budget_allocated,
                funds_released: funding.funds_released,
                funds_utilized: funding.funds_utilized,
                funds_committed: funding.funds_committed,
                status: funding.status.to_value(),
            })
            .collect())
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Resolves the set of project IDs the filter narrows to, or `None`
    /// when every project is in scope.
    async fn project_scope(&self, filter: &ReportFilter) -> Result<Option<Vec<Uuid>>, ReportError> {
        if let Some(project_id) = filter.project_id {
            return Ok(Some(vec![project_id]));
        }

        if let Some(province_id) = filter.province_id {
            let ids: Vec<Uuid> = projects::Entity::find()
                .filter(projects::Column::ProvinceId.eq(province_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect();
            return Ok(Some(ids));
        }

        Ok(None)
    }

    /// Resolves section names for the given section IDs.
    async fn section_names(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, String>, ReportError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sections = project_sections::Entity::find()
            .filter(project_sections::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(sections.into_iter().map(|s| (s.id, s.name)).collect())
    }
}

// ============================================================================
// Filter Helpers
// ============================================================================

/// Parses a wire status value into an entity's active enum.
fn parse_status<E>(value: &str, entity: &'static str) -> Result<E, ReportError>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&value.to_string()).map_err(|_| ReportError::InvalidStatus {
        value: value.to_string(),
        entity,
    })
}

/// Applies the filter's inclusive date window to a timestamptz column.
fn apply_timestamp_window<E>(
    mut query: Select<E>,
    column: impl ColumnTrait,
    filter: &ReportFilter,
) -> Select<E>
where
    E: EntityTrait,
{
    if let Some(start) = filter.start_date {
        query = query.filter(column.gte(day_start(start)));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(column.lt(day_start(end) + Duration::days(1)));
    }
    query
}

/// Midnight UTC at the start of the given day.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
