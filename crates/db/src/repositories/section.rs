//! Project section repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{project_sections, projects, sea_orm_active_enums::SectionStatus};

/// Error types for section operations.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    /// Section not found.
    #[error("Section not found: {0}")]
    NotFound(Uuid),

    /// Owning project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Chainage end before start.
    #[error("Invalid chainage: end {end} is before start {start}")]
    InvalidChainage {
        /// Chainage start in km.
        start: Decimal,
        /// Chainage end in km.
        end: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a section.
#[derive(Debug, Clone)]
pub struct CreateSectionInput {
    /// Section name.
    pub name: String,
    /// Chainage start in kilometres.
    pub start_km: Decimal,
    /// Chainage end in kilometres.
    pub end_km: Decimal,
    /// Length in metres; derived from chainage when absent.
    pub length_m: Option<Decimal>,
    /// Budget allocated.
    pub budget_allocated: Decimal,
    /// Assigned contractor, if any.
    pub contractor_id: Option<Uuid>,
}

/// Input for a partial section update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSectionInput {
    /// New name.
    pub name: Option<String>,
    /// New progress percentage.
    pub progress_pct: Option<Decimal>,
    /// New allocated budget.
    pub budget_allocated: Option<Decimal>,
    /// New spent budget.
    pub budget_spent: Option<Decimal>,
    /// New assigned contractor.
    pub contractor_id: Option<Uuid>,
    /// New status.
    pub status: Option<SectionStatus>,
}

const METRES_PER_KM: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Section repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SectionRepository {
    db: DatabaseConnection,
}

impl SectionRepository {
    /// Creates a new section repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a section by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<project_sections::Model>, DbErr> {
        project_sections::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists a project's sections in chainage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<project_sections::Model>, DbErr> {
        project_sections::Entity::find()
            .filter(project_sections::Column::ProjectId.eq(project_id))
            .order_by_asc(project_sections::Column::StartKm)
            .all(&self.db)
            .await
    }

    /// Creates a section under a project.
    ///
    /// # Errors
    ///
    /// Returns `SectionError::ProjectNotFound` if the project does not
    /// exist, `SectionError::InvalidChainage` for a reversed chainage, or a
    /// database error.
    pub async fn create(
        &self,
        project_id: Uuid,
        input: CreateSectionInput,
    ) -> Result<project_sections::Model, SectionError> {
        if input.end_km < input.start_km {
            return Err(SectionError::InvalidChainage {
                start: input.start_km,
                end: input.end_km,
            });
        }

        let project = projects::Entity::find_by_id(project_id).one(&self.db).await?;
        if project.is_none() {
            return Err(SectionError::ProjectNotFound(project_id));
        }

        let length_m = input
            .length_m
            .unwrap_or((input.end_km - input.start_km) * METRES_PER_KM);
        let now = chrono::Utc::now().into();

        let section = project_sections::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            name: Set(input.name),
            start_km: Set(input.start_km),
            end_km: Set(input.end_km),
            length_m: Set(length_m),
            progress_pct: Set(Decimal::ZERO),
            budget_allocated: Set(input.budget_allocated),
            budget_spent: Set(Decimal::ZERO),
            contractor_id: Set(input.contractor_id),
            status: Set(SectionStatus::NotStarted),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(section.insert(&self.db).await?)
    }

    /// Applies a partial update to a section.
    ///
    /// # Errors
    ///
    /// Returns `SectionError::NotFound` if the section does not exist, or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSectionInput,
    ) -> Result<project_sections::Model, SectionError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(SectionError::NotFound(id))?;

        let mut section: project_sections::ActiveModel = existing.into();
        if let Some(name) = input.name {
            section.name = Set(name);
        }
        if let Some(progress) = input.progress_pct {
            section.progress_pct = Set(progress);
        }
        if let Some(allocated) = input.budget_allocated {
            section.budget_allocated = Set(allocated);
        }
        if let Some(spent) = input.budget_spent {
            section.budget_spent = Set(spent);
        }
        if let Some(contractor_id) = input.contractor_id {
            section.contractor_id = Set(Some(contractor_id));
        }
        if let Some(status) = input.status {
            section.status = Set(status);
        }
        section.updated_at = Set(chrono::Utc::now().into());

        Ok(section.update(&self.db).await?)
    }

    /// Hard-deletes a section. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = project_sections::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
