//! Contractor repository, including project assignments.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use trakim_shared::types::PageRequest;

use crate::entities::{
    contractor_projects, contractors, projects,
    sea_orm_active_enums::{CertificationLevel, ContractStatus},
};

/// Error types for contractor operations.
#[derive(Debug, thiserror::Error)]
pub enum ContractorError {
    /// Contractor not found.
    #[error("Contractor not found: {0}")]
    NotFound(Uuid),

    /// Referenced project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Assignment not found.
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(Uuid),

    /// License number already registered.
    #[error("License number already registered: {0}")]
    DuplicateLicense(String),

    /// Contractor already assigned to the project.
    #[error("Contractor already assigned to project")]
    DuplicateAssignment,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a contractor.
#[derive(Debug, Clone)]
pub struct CreateContractorInput {
    /// Company name.
    pub name: String,
    /// Unique license number.
    pub license_number: String,
    /// Certification level.
    pub certification_level: CertificationLevel,
    /// Specialization strings.
    pub specializations: Vec<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
}

/// Input for a partial contractor update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateContractorInput {
    /// New company name.
    pub name: Option<String>,
    /// New certification level.
    pub certification_level: Option<CertificationLevel>,
    /// New specializations (replaces the whole set).
    pub specializations: Option<Vec<String>>,
    /// New contact email.
    pub contact_email: Option<String>,
    /// New contact phone.
    pub contact_phone: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Filter for listing contractors.
#[derive(Debug, Clone, Default)]
pub struct ContractorFilter {
    /// Restrict to one certification level.
    pub certification_level: Option<CertificationLevel>,
    /// Restrict to active/inactive contractors.
    pub is_active: Option<bool>,
}

/// Input for assigning a contractor to a project.
#[derive(Debug, Clone)]
pub struct CreateAssignmentInput {
    /// Project to assign to.
    pub project_id: Uuid,
    /// Contract value.
    pub contract_value: Decimal,
    /// Initial contract status; defaults to draft.
    pub contract_status: Option<ContractStatus>,
    /// Contract start date.
    pub start_date: Option<chrono::NaiveDate>,
    /// Contract end date.
    pub end_date: Option<chrono::NaiveDate>,
}

/// Input for a partial assignment update.
#[derive(Debug, Clone, Default)]
pub struct UpdateAssignmentInput {
    /// New contract value.
    pub contract_value: Option<Decimal>,
    /// New contract status.
    pub contract_status: Option<ContractStatus>,
    /// New performance rating (0-5).
    pub performance_rating: Option<Decimal>,
    /// New end date.
    pub end_date: Option<chrono::NaiveDate>,
}

/// Contractor repository for CRUD operations and assignments.
#[derive(Debug, Clone)]
pub struct ContractorRepository {
    db: DatabaseConnection,
}

impl ContractorRepository {
    /// Creates a new contractor repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a contractor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<contractors::Model>, DbErr> {
        contractors::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks whether a license number is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn license_exists(&self, license_number: &str) -> Result<bool, DbErr> {
        let count = contractors::Entity::find()
            .filter(contractors::Column::LicenseNumber.eq(license_number))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Lists contractors matching the filter, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ContractorFilter,
        page: &PageRequest,
    ) -> Result<(Vec<contractors::Model>, u64), DbErr> {
        let mut query = contractors::Entity::find();

        if let Some(level) = &filter.certification_level {
            query = query.filter(contractors::Column::CertificationLevel.eq(level.clone()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(contractors::Column::IsActive.eq(is_active));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(contractors::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Creates a contractor, enforcing license uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `ContractorError::DuplicateLicense` if the license number is
    /// taken, or a database error.
    pub async fn create(
        &self,
        input: CreateContractorInput,
    ) -> Result<contractors::Model, ContractorError> {
        if self.license_exists(&input.license_number).await? {
            return Err(ContractorError::DuplicateLicense(input.license_number));
        }

        let now = chrono::Utc::now().into();

        let contractor = contractors::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            license_number: Set(input.license_number),
            certification_level: Set(input.certification_level),
            specializations: Set(serde_json::json!(input.specializations)),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(contractor.insert(&self.db).await?)
    }

    /// Applies a partial update to a contractor.
    ///
    /// # Errors
    ///
    /// Returns `ContractorError::NotFound` if the contractor does not
    /// exist, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateContractorInput,
    ) -> Result<contractors::Model, ContractorError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ContractorError::NotFound(id))?;

        let mut contractor: contractors::ActiveModel = existing.into();
        if let Some(name) = input.name {
            contractor.name = Set(name);
        }
        if let Some(level) = input.certification_level {
            contractor.certification_level = Set(level);
        }
        if let Some(specializations) = input.specializations {
            contractor.specializations = Set(serde_json::json!(specializations));
        }
        if let Some(email) = input.contact_email {
            contractor.contact_email = Set(Some(email));
        }
        if let Some(phone) = input.contact_phone {
            contractor.contact_phone = Set(Some(phone));
        }
        if let Some(is_active) = input.is_active {
            contractor.is_active = Set(is_active);
        }
        contractor.updated_at = Set(chrono::Utc::now().into());

        Ok(contractor.update(&self.db).await?)
    }

    /// Hard-deletes a contractor. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = contractors::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// Assigns a contractor to a project.
    ///
    /// # Errors
    ///
    /// Returns `ContractorError::DuplicateAssignment` if the pair already
    /// exists, `ContractorError::NotFound`/`ProjectNotFound` for missing
    /// references, or a database error.
    pub async fn assign(
        &self,
        contractor_id: Uuid,
        input: CreateAssignmentInput,
    ) -> Result<contractor_projects::Model, ContractorError> {
        if self.find_by_id(contractor_id).await?.is_none() {
            return Err(ContractorError::NotFound(contractor_id));
        }
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await?;
        if project.is_none() {
            return Err(ContractorError::ProjectNotFound(input.project_id));
        }

        let existing = contractor_projects::Entity::find()
            .filter(contractor_projects::Column::ContractorId.eq(contractor_id))
            .filter(contractor_projects::Column::ProjectId.eq(input.project_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(ContractorError::DuplicateAssignment);
        }

        let now = chrono::Utc::now().into();

        let assignment = contractor_projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            contractor_id: Set(contractor_id),
            project_id: Set(input.project_id),
            contract_value: Set(input.contract_value),
            contract_status: Set(input.contract_status.unwrap_or(ContractStatus::Draft)),
            performance_rating: Set(None),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(assignment.insert(&self.db).await?)
    }

    /// Applies a partial update to an assignment.
    ///
    /// # Errors
    ///
    /// Returns `ContractorError::AssignmentNotFound` if the assignment does
    /// not exist, or a database error.
    pub async fn update_assignment(
        &self,
        assignment_id: Uuid,
        input: UpdateAssignmentInput,
    ) -> Result<contractor_projects::Model, ContractorError> {
        let existing = contractor_projects::Entity::find_by_id(assignment_id)
            .one(&self.db)
            .await?
            .ok_or(ContractorError::AssignmentNotFound(assignment_id))?;

        let mut assignment: contractor_projects::ActiveModel = existing.into();
        if let Some(value) = input.contract_value {
            assignment.contract_value = Set(value);
        }
        if let Some(status) = input.contract_status {
            assignment.contract_status = Set(status);
        }
        if let Some(rating) = input.performance_rating {
            assignment.performance_rating = Set(Some(rating));
        }
        if let Some(end_date) = input.end_date {
            assignment.end_date = Set(Some(end_date));
        }
        assignment.updated_at = Set(chrono::Utc::now().into());

        Ok(assignment.update(&self.db).await?)
    }

    /// Lists a contractor's assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_assignments(
        &self,
        contractor_id: Uuid,
    ) -> Result<Vec<contractor_projects::Model>, DbErr> {
        contractor_projects::Entity::find()
            .filter(contractor_projects::Column::ContractorId.eq(contractor_id))
            .order_by_desc(contractor_projects::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists the contractor IDs assigned to a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn assigned_contractor_ids(&self, project_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        contractor_projects::Entity::find()
            .filter(contractor_projects::Column::ProjectId.eq(project_id))
            .select_only()
            .column(contractor_projects::Column::ContractorId)
            .into_tuple()
            .all(&self.db)
            .await
    }
}
