//! Milestone repository, including the audit trail of updates.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    milestone_updates, milestones, projects,
    sea_orm_active_enums::{MilestoneCategory, MilestoneStatus},
};

/// Error types for milestone operations.
#[derive(Debug, thiserror::Error)]
pub enum MilestoneError {
    /// Milestone not found.
    #[error("Milestone not found: {0}")]
    NotFound(Uuid),

    /// Owning project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a milestone.
#[derive(Debug, Clone)]
pub struct CreateMilestoneInput {
    /// Owning project.
    pub project_id: Uuid,
    /// Milestone name.
    pub name: String,
    /// Category.
    pub category: MilestoneCategory,
    /// Planned achievement date.
    pub planned_date: NaiveDate,
}

/// Input for a partial milestone update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateMilestoneInput {
    /// New name.
    pub name: Option<String>,
    /// New planned date.
    pub planned_date: Option<NaiveDate>,
    /// Actual achievement date.
    pub actual_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<MilestoneStatus>,
}

/// Input for recording a status change in the audit trail.
#[derive(Debug, Clone)]
pub struct CreateMilestoneUpdateInput {
    /// New status.
    pub status: MilestoneStatus,
    /// Note explaining the change.
    pub note: Option<String>,
    /// User recording the change.
    pub updated_by: Option<Uuid>,
}

/// Milestone repository.
#[derive(Debug, Clone)]
pub struct MilestoneRepository {
    db: DatabaseConnection,
}

impl MilestoneRepository {
    /// Creates a new milestone repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a milestone by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<milestones::Model>, DbErr> {
        milestones::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists a project's milestones by planned date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<milestones::Model>, DbErr> {
        milestones::Entity::find()
            .filter(milestones::Column::ProjectId.eq(project_id))
            .order_by_asc(milestones::Column::PlannedDate)
            .all(&self.db)
            .await
    }

    /// Creates a milestone under a project.
    ///
    /// # Errors
    ///
    /// Returns `MilestoneError::ProjectNotFound` if the project does not
    /// exist, or a database error.
    pub async fn create(
        &self,
        input: CreateMilestoneInput,
    ) -> Result<milestones::Model, MilestoneError> {
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await?;
        if project.is_none() {
            return Err(MilestoneError::ProjectNotFound(input.project_id));
        }

        let now = chrono::Utc::now().into();

        let milestone = milestones::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            name: Set(input.name),
            category: Set(input.category),
            planned_date: Set(input.planned_date),
            actual_date: Set(None),
            status: Set(MilestoneStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(milestone.insert(&self.db).await?)
    }

    /// Applies a partial update to a milestone.
    ///
    /// # Errors
    ///
    /// Returns `MilestoneError::NotFound` if the milestone does not exist,
    /// or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateMilestoneInput,
    ) -> Result<milestones::Model, MilestoneError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(MilestoneError::NotFound(id))?;

        let mut milestone: milestones::ActiveModel = existing.into();
        if let Some(name) = input.name {
            milestone.name = Set(name);
        }
        if let Some(planned_date) = input.planned_date {
            milestone.planned_date = Set(planned_date);
        }
        if let Some(actual_date) = input.actual_date {
            milestone.actual_date = Set(Some(actual_date));
        }
        if let Some(status) = input.status {
            milestone.status = Set(status);
        }
        milestone.updated_at = Set(chrono::Utc::now().into());

        Ok(milestone.update(&self.db).await?)
    }

    /// Records a status change: inserts an audit row and moves the
    /// milestone to the new status in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `MilestoneError::NotFound` if the milestone does not exist,
    /// or a database error.
    pub async fn add_update(
        &self,
        milestone_id: Uuid,
        input: CreateMilestoneUpdateInput,
    ) -> Result<milestone_updates::Model, MilestoneError> {
        let existing = self
            .find_by_id(milestone_id)
            .await?
            .ok_or(MilestoneError::NotFound(milestone_id))?;

        let txn = self.db.begin().await?;
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        let update_row = milestone_updates::ActiveModel {
            id: Set(Uuid::new_v4()),
            milestone_id: Set(milestone_id),
            status: Set(input.status.clone()),
            note: Set(input.note),
            updated_by: Set(input.updated_by),
            created_at: Set(now),
        };
        let update_row = update_row.insert(&txn).await?;

        let mut milestone: milestones::ActiveModel = existing.into();
        milestone.status = Set(input.status);
        milestone.updated_at = Set(now);
        milestone.update(&txn).await?;

        txn.commit().await?;

        Ok(update_row)
    }

    /// Lists a milestone's audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_updates(
        &self,
        milestone_id: Uuid,
    ) -> Result<Vec<milestone_updates::Model>, DbErr> {
        milestone_updates::Entity::find()
            .filter(milestone_updates::Column::MilestoneId.eq(milestone_id))
            .order_by_asc(milestone_updates::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Hard-deletes a milestone. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = milestones::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
