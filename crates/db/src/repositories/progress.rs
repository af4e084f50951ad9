//! Progress report repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use trakim_shared::types::PageRequest;

use crate::entities::{progress_reports, projects, sea_orm_active_enums::ScheduleStatus};

/// Error types for progress report operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Report not found.
    #[error("Progress report not found: {0}")]
    NotFound(Uuid),

    /// Owning project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for filing a progress report.
#[derive(Debug, Clone)]
pub struct CreateProgressReportInput {
    /// Owning project.
    pub project_id: Uuid,
    /// Section, if section-scoped.
    pub section_id: Option<Uuid>,
    /// Reporting date.
    pub report_date: NaiveDate,
    /// Progress at the reporting date (0-100).
    pub current_progress: Decimal,
    /// Progress at the previous report (0-100).
    pub previous_progress: Decimal,
    /// Planned progress at the reporting date (0-100).
    pub planned_progress: Decimal,
    /// Schedule status.
    pub schedule_status: ScheduleStatus,
    /// Completed work descriptions.
    pub works_completed: Vec<String>,
    /// Open issues.
    pub issues: Option<String>,
    /// Reporting user.
    pub reported_by: Option<Uuid>,
}

/// Input for a partial progress report update; absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProgressReportInput {
    /// New current progress.
    pub current_progress: Option<Decimal>,
    /// New planned progress.
    pub planned_progress: Option<Decimal>,
    /// New schedule status.
    pub schedule_status: Option<ScheduleStatus>,
    /// New completed-works list (replaces the whole list).
    pub works_completed: Option<Vec<String>>,
    /// New issues text.
    pub issues: Option<String>,
}

/// Filter for listing progress reports.
#[derive(Debug, Clone, Default)]
pub struct ProgressFilter {
    /// Restrict to one project.
    pub project_id: Option<Uuid>,
    /// Restrict to one section.
    pub section_id: Option<Uuid>,
    /// Restrict to one schedule status.
    pub schedule_status: Option<ScheduleStatus>,
    /// Inclusive lower bound on `report_date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `report_date`.
    pub end_date: Option<NaiveDate>,
}

/// Progress report repository.
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    db: DatabaseConnection,
}

impl ProgressRepository {
    /// Creates a new progress report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a report by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<progress_reports::Model>, DbErr> {
        progress_reports::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists reports matching the filter, newest report date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ProgressFilter,
        page: &PageRequest,
    ) -> Result<(Vec<progress_reports::Model>, u64), DbErr> {
        let mut query = progress_reports::Entity::find();

        if let Some(project_id) = filter.project_id {
            query = query.filter(progress_reports::Column::ProjectId.eq(project_id));
        }
        if let Some(section_id) = filter.section_id {
            query = query.filter(progress_reports::Column::SectionId.eq(section_id));
        }
        if let Some(status) = &filter.schedule_status {
            query = query.filter(progress_reports::Column::ScheduleStatus.eq(status.clone()));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(progress_reports::Column::ReportDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(progress_reports::Column::ReportDate.lte(end));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(progress_reports::Column::ReportDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Files a new progress report.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ProjectNotFound` if the project does not
    /// exist, or a database error.
    pub async fn create(
        &self,
        input: CreateProgressReportInput,
    ) -> Result<progress_reports::Model, ProgressError> {
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await?;
        if project.is_none() {
            return Err(ProgressError::ProjectNotFound(input.project_id));
        }

        let now = chrono::Utc::now().into();

        let report = progress_reports::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            section_id: Set(input.section_id),
            report_date: Set(input.report_date),
            current_progress: Set(input.current_progress),
            previous_progress: Set(input.previous_progress),
            planned_progress: Set(input.planned_progress),
            schedule_status: Set(input.schedule_status),
            works_completed: Set(serde_json::json!(input.works_completed)),
            issues: Set(input.issues),
            reported_by: Set(input.reported_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(report.insert(&self.db).await?)
    }

    /// Applies a partial update to a progress report.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NotFound` if the report does not exist, or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProgressReportInput,
    ) -> Result<progress_reports::Model, ProgressError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ProgressError::NotFound(id))?;

        let mut report: progress_reports::ActiveModel = existing.into();
        if let Some(value) = input.current_progress {
            report.current_progress = Set(value);
        }
        if let Some(value) = input.planned_progress {
            report.planned_progress = Set(value);
        }
        if let Some(value) = input.schedule_status {
            report.schedule_status = Set(value);
        }
        if let Some(value) = input.works_completed {
            report.works_completed = Set(serde_json::json!(value));
        }
        if let Some(value) = input.issues {
            report.issues = Set(Some(value));
        }
        report.updated_at = Set(chrono::Utc::now().into());

        Ok(report.update(&self.db).await?)
    }

    /// Hard-deletes a progress report. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = progress_reports::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
