//! Quality/HSE report repository.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use trakim_shared::types::PageRequest;

use crate::entities::{
    projects, quality_reports,
    sea_orm_active_enums::{ComplianceStatus, QaQcStatus, QualityReportType},
};

/// Error types for quality report operations.
#[derive(Debug, thiserror::Error)]
pub enum QualityError {
    /// Report not found.
    #[error("Quality report not found: {0}")]
    NotFound(Uuid),

    /// Owning project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for filing a quality report.
#[derive(Debug, Clone)]
pub struct CreateQualityReportInput {
    /// Owning project.
    pub project_id: Uuid,
    /// Section, if section-scoped.
    pub section_id: Option<Uuid>,
    /// Report type.
    pub report_type: QualityReportType,
    /// Test/inspection date.
    pub test_date: NaiveDate,
    /// Specification compliance outcome.
    pub spec_compliance: ComplianceStatus,
    /// Environmental compliance outcome.
    pub environmental_compliance: ComplianceStatus,
    /// Social compliance outcome.
    pub social_compliance: ComplianceStatus,
    /// Quality-gate outcome.
    pub qa_qc_status: QaQcStatus,
    /// Deficiency descriptions.
    pub deficiencies: Vec<String>,
    /// Corrective actions.
    pub corrective_actions: Vec<String>,
    /// Whether a follow-up is required.
    pub follow_up_required: bool,
    /// Follow-up date, if scheduled.
    pub follow_up_date: Option<NaiveDate>,
    /// Inspecting user.
    pub inspector_id: Option<Uuid>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Input for a partial quality report update; absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateQualityReportInput {
    /// New spec compliance outcome.
    pub spec_compliance: Option<ComplianceStatus>,
    /// New environmental compliance outcome.
    pub environmental_compliance: Option<ComplianceStatus>,
    /// New social compliance outcome.
    pub social_compliance: Option<ComplianceStatus>,
    /// New quality-gate outcome.
    pub qa_qc_status: Option<QaQcStatus>,
    /// New deficiencies (replaces the whole list).
    pub deficiencies: Option<Vec<String>>,
    /// New corrective actions (replaces the whole list).
    pub corrective_actions: Option<Vec<String>>,
    /// New follow-up flag.
    pub follow_up_required: Option<bool>,
    /// New follow-up date.
    pub follow_up_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Filter for listing quality reports.
#[derive(Debug, Clone, Default)]
pub struct QualityFilter {
    /// Restrict to one project.
    pub project_id: Option<Uuid>,
    /// Restrict to one section.
    pub section_id: Option<Uuid>,
    /// Restrict to one report type.
    pub report_type: Option<QualityReportType>,
    /// Restrict to one quality-gate outcome.
    pub qa_qc_status: Option<QaQcStatus>,
    /// Inclusive lower bound on `test_date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `test_date`.
    pub end_date: Option<NaiveDate>,
}

/// Quality report repository.
#[derive(Debug, Clone)]
pub struct QualityRepository {
    db: DatabaseConnection,
}

impl QualityRepository {
    /// Creates a new quality report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a report by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<quality_reports::Model>, DbErr> {
        quality_reports::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists reports matching the filter, newest test date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &QualityFilter,
        page: &PageRequest,
    ) -> Result<(Vec<quality_reports::Model>, u64), DbErr> {
        let mut query = quality_reports::Entity::find();

        if let Some(project_id) = filter.project_id {
            query = query.filter(quality_reports::Column::ProjectId.eq(project_id));
        }
        if let Some(section_id) = filter.section_id {
            query = query.filter(quality_reports::Column::SectionId.eq(section_id));
        }
        if let Some(report_type) = &filter.report_type {
            query = query.filter(quality_reports::Column::ReportType.eq(report_type.clone()));
        }
        if let Some(status) = &filter.qa_qc_status {
            query = query.filter(quality_reports::Column::QaQcStatus.eq(status.clone()));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(quality_reports::Column::TestDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(quality_reports::Column::TestDate.lte(end));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(quality_reports::Column::TestDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Files a new quality report.
    ///
    /// # Errors
    ///
    /// Returns `QualityError::ProjectNotFound` if the project does not
    /// exist, or a database error.
    pub async fn create(
        &self,
        input: CreateQualityReportInput,
    ) -> Result<quality_reports::Model, QualityError> {
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await?;
        if project.is_none() {
            return Err(QualityError::ProjectNotFound(input.project_id));
        }

        let now = chrono::Utc::now().into();

        let report = quality_reports::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            section_id: Set(input.section_id),
            report_type: Set(input.report_type),
            test_date: Set(input.test_date),
            spec_compliance: Set(input.spec_compliance),
            environmental_compliance: Set(input.environmental_compliance),
            social_compliance: Set(input.social_compliance),
            qa_qc_status: Set(input.qa_qc_status),
            deficiencies: Set(serde_json::json!(input.deficiencies)),
            corrective_actions: Set(serde_json::json!(input.corrective_actions)),
            follow_up_required: Set(input.follow_up_required),
            follow_up_date: Set(input.follow_up_date),
            inspector_id: Set(input.inspector_id),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(report.insert(&self.db).await?)
    }

    /// Applies a partial update to a quality report.
    ///
    /// # Errors
    ///
    /// Returns `QualityError::NotFound` if the report does not exist, or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateQualityReportInput,
    ) -> Result<quality_reports::Model, QualityError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(QualityError::NotFound(id))?;

        let mut report: quality_reports::ActiveModel = existing.into();
        if let Some(value) = input.spec_compliance {
            report.spec_compliance = Set(value);
        }
        if let Some(value) = input.environmental_compliance {
            report.environmental_compliance = Set(value);
        }
        if let Some(value) = input.social_compliance {
            report.social_compliance = Set(value);
        }
        if let Some(value) = input.qa_qc_status {
            report.qa_qc_status = Set(value);
        }
        if let Some(value) = input.deficiencies {
            report.deficiencies = Set(serde_json::json!(value));
        }
        if let Some(value) = input.corrective_actions {
            report.corrective_actions = Set(serde_json::json!(value));
        }
        if let Some(value) = input.follow_up_required {
            report.follow_up_required = Set(value);
        }
        if let Some(value) = input.follow_up_date {
            report.follow_up_date = Set(Some(value));
        }
        if let Some(value) = input.notes {
            report.notes = Set(Some(value));
        }
        report.updated_at = Set(chrono::Utc::now().into());

        Ok(report.update(&self.db).await?)
    }

    /// Hard-deletes a quality report. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = quality_reports::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
