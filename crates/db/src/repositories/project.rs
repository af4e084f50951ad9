//! Project repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use trakim_shared::types::PageRequest;

use crate::entities::{projects, provinces, sea_orm_active_enums::ProjectStatus};

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    /// Referenced province does not exist.
    #[error("Province not found: {0}")]
    ProvinceNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    /// Project name.
    pub name: String,
    /// Province the road runs through.
    pub province_id: Uuid,
    /// Initial status; defaults to planning.
    pub status: Option<ProjectStatus>,
    /// Total road distance in metres.
    pub total_distance_m: Decimal,
    /// Start coordinates (latitude, longitude).
    pub start_coordinates: Option<(Decimal, Decimal)>,
    /// End coordinates (latitude, longitude).
    pub end_coordinates: Option<(Decimal, Decimal)>,
    /// Funding sponsor.
    pub sponsor: Option<String>,
    /// Team lead name.
    pub team_lead: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Input for a partial project update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    /// New name.
    pub name: Option<String>,
    /// New province.
    pub province_id: Option<Uuid>,
    /// New status.
    pub status: Option<ProjectStatus>,
    /// New total distance in metres.
    pub total_distance_m: Option<Decimal>,
    /// New sponsor.
    pub sponsor: Option<String>,
    /// New team lead.
    pub team_lead: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Filter for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Restrict to one province.
    pub province_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<ProjectStatus>,
    /// Restrict to an explicit set of projects (per-user access scope).
    pub project_ids: Option<Vec<Uuid>>,
}

/// Project repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a project by ID, with its province.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<(projects::Model, Option<provinces::Model>)>, DbErr> {
        projects::Entity::find_by_id(id)
            .find_also_related(provinces::Entity)
            .one(&self.db)
            .await
    }

    /// Lists projects matching the filter, newest first, with provinces.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ProjectFilter,
        page: &PageRequest,
    ) -> Result<(Vec<(projects::Model, Option<provinces::Model>)>, u64), DbErr> {
        let mut query = projects::Entity::find();

        if let Some(province_id) = filter.province_id {
            query = query.filter(projects::Column::ProvinceId.eq(province_id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(projects::Column::Status.eq(status.clone()));
        }
        if let Some(ids) = &filter.project_ids {
            query = query.filter(projects::Column::Id.is_in(ids.clone()));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .find_also_related(provinces::Entity)
            .order_by_desc(projects::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Creates a new project after validating the province reference.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::ProvinceNotFound` if the province does not
    /// exist, or a database error.
    pub async fn create(&self, input: CreateProjectInput) -> Result<projects::Model, ProjectError> {
        let province = provinces::Entity::find_by_id(input.province_id)
            .one(&self.db)
            .await?;
        if province.is_none() {
            return Err(ProjectError::ProvinceNotFound(input.province_id));
        }

        let now = chrono::Utc::now().into();

        let project = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            province_id: Set(input.province_id),
            status: Set(input.status.unwrap_or(ProjectStatus::Planning)),
            total_distance_m: Set(input.total_distance_m),
            start_latitude: Set(input.start_coordinates.map(|(lat, _)| lat)),
            start_longitude: Set(input.start_coordinates.map(|(_, lng)| lng)),
            end_latitude: Set(input.end_coordinates.map(|(lat, _)| lat)),
            end_longitude: Set(input.end_coordinates.map(|(_, lng)| lng)),
            sponsor: Set(input.sponsor),
            team_lead: Set(input.team_lead),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(project.insert(&self.db).await?)
    }

    /// Applies a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` if the project does not exist, or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProjectInput,
    ) -> Result<projects::Model, ProjectError> {
        let existing = projects::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        if let Some(province_id) = input.province_id {
            let province = provinces::Entity::find_by_id(province_id)
                .one(&self.db)
                .await?;
            if province.is_none() {
                return Err(ProjectError::ProvinceNotFound(province_id));
            }
        }

        let mut project: projects::ActiveModel = existing.into();
        if let Some(name) = input.name {
            project.name = Set(name);
        }
        if let Some(province_id) = input.province_id {
            project.province_id = Set(province_id);
        }
        if let Some(status) = input.status {
            project.status = Set(status);
        }
        if let Some(distance) = input.total_distance_m {
            project.total_distance_m = Set(distance);
        }
        if let Some(sponsor) = input.sponsor {
            project.sponsor = Set(Some(sponsor));
        }
        if let Some(team_lead) = input.team_lead {
            project.team_lead = Set(Some(team_lead));
        }
        if let Some(description) = input.description {
            project.description = Set(Some(description));
        }
        project.updated_at = Set(chrono::Utc::now().into());

        Ok(project.update(&self.db).await?)
    }

    /// Hard-deletes a project. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = projects::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Lists all project IDs (used for global-access scoping).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn all_ids(&self) -> Result<Vec<Uuid>, DbErr> {
        projects::Entity::find()
            .select_only()
            .column(projects::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
    }
}
