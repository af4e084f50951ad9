//! Project funding repository, including drawdown transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use trakim_shared::types::PageRequest;

use crate::entities::{
    funding_transactions, project_funding, projects,
    sea_orm_active_enums::{FundingStatus, FundingTransactionType},
};

/// Error types for funding operations.
#[derive(Debug, thiserror::Error)]
pub enum FundingError {
    /// Funding record not found.
    #[error("Funding record not found: {0}")]
    NotFound(Uuid),

    /// Owning project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Transaction amount must be positive.
    #[error("Transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a funding record.
#[derive(Debug, Clone)]
pub struct CreateFundingInput {
    /// Owning project.
    pub project_id: Uuid,
    /// Funding source.
    pub funding_source: String,
    /// Budget allocated.
    pub budget_allocated: Decimal,
    /// Initial status; defaults to pending.
    pub status: Option<FundingStatus>,
    /// Fiscal year.
    pub fiscal_year: i32,
}

/// Input for a partial funding update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateFundingInput {
    /// New funding source.
    pub funding_source: Option<String>,
    /// New allocated budget.
    pub budget_allocated: Option<Decimal>,
    /// New status.
    pub status: Option<FundingStatus>,
}

/// Input for recording a funding transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Transaction type.
    pub transaction_type: FundingTransactionType,
    /// Amount (positive).
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// External reference (voucher number etc.).
    pub reference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Filter for listing funding records.
#[derive(Debug, Clone, Default)]
pub struct FundingFilter {
    /// Restrict to one project.
    pub project_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<FundingStatus>,
    /// Restrict to one fiscal year.
    pub fiscal_year: Option<i32>,
}

/// Funding repository.
#[derive(Debug, Clone)]
pub struct FundingRepository {
    db: DatabaseConnection,
}

impl FundingRepository {
    /// Creates a new funding repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a funding record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<project_funding::Model>, DbErr> {
        project_funding::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists funding records matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &FundingFilter,
        page: &PageRequest,
    ) -> Result<(Vec<project_funding::Model>, u64), DbErr> {
        let mut query = project_funding::Entity::find();

        if let Some(project_id) = filter.project_id {
            query = query.filter(project_funding::Column::ProjectId.eq(project_id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(project_funding::Column::Status.eq(status.clone()));
        }
        if let Some(fiscal_year) = filter.fiscal_year {
            query = query.filter(project_funding::Column::FiscalYear.eq(fiscal_year));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(project_funding::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Creates a funding record.
    ///
    /// # Errors
    ///
    /// Returns `FundingError::ProjectNotFound` if the project does not
    /// exist, or a database error.
    pub async fn create(
        &self,
        input: CreateFundingInput,
    ) -> Result<project_funding::Model, FundingError> {
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await?;
        if project.is_none() {
            return Err(FundingError::ProjectNotFound(input.project_id));
        }

        let now = chrono::Utc::now().into();

        let funding = project_funding::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            funding_source: Set(input.funding_source),
            budget_allocated: Set(input.budget_allocated),
            funds_released: Set(Decimal::ZERO),
            funds_utilized: Set(Decimal::ZERO),
            funds_committed: Set(Decimal::ZERO),
            status: Set(input.status.unwrap_or(FundingStatus::Pending)),
            fiscal_year: Set(input.fiscal_year),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(funding.insert(&self.db).await?)
    }

    /// Applies a partial update to a funding record.
    ///
    /// # Errors
    ///
    /// Returns `FundingError::NotFound` if the record does not exist, or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateFundingInput,
    ) -> Result<project_funding::Model, FundingError> {
        let existing = self.find_by_id(id).await?.ok_or(FundingError::NotFound(id))?;

        let mut funding: project_funding::ActiveModel = existing.into();
        if let Some(source) = input.funding_source {
            funding.funding_source = Set(source);
        }
        if let Some(allocated) = input.budget_allocated {
            funding.budget_allocated = Set(allocated);
        }
        if let Some(status) = input.status {
            funding.status = Set(status);
        }
        funding.updated_at = Set(chrono::Utc::now().into());

        Ok(funding.update(&self.db).await?)
    }

    /// Records a transaction and rolls its amount into the parent record's
    /// running totals in one database transaction.
    ///
    /// Releases bump `funds_released`, expenditures bump `funds_utilized`,
    /// commitments bump `funds_committed`. Adjustments only add an audit
    /// row.
    ///
    /// # Errors
    ///
    /// Returns `FundingError::NotFound` if the record does not exist,
    /// `FundingError::NonPositiveAmount` for a non-positive amount, or a
    /// database error.
    pub async fn add_transaction(
        &self,
        funding_id: Uuid,
        input: CreateTransactionInput,
    ) -> Result<funding_transactions::Model, FundingError> {
        if input.amount <= Decimal::ZERO {
            return Err(FundingError::NonPositiveAmount(input.amount));
        }

        let existing = self
            .find_by_id(funding_id)
            .await?
            .ok_or(FundingError::NotFound(funding_id))?;

        let txn = self.db.begin().await?;
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        let row = funding_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            funding_id: Set(funding_id),
            transaction_type: Set(input.transaction_type.clone()),
            amount: Set(input.amount),
            transaction_date: Set(input.transaction_date),
            reference: Set(input.reference),
            description: Set(input.description),
            created_at: Set(now),
        };
        let row = row.insert(&txn).await?;

        let released = existing.funds_released;
        let utilized = existing.funds_utilized;
        let committed = existing.funds_committed;

        let mut funding: project_funding::ActiveModel = existing.into();
        match input.transaction_type {
            FundingTransactionType::Release => {
                funding.funds_released = Set(released + input.amount);
            }
            FundingTransactionType::Expenditure => {
                funding.funds_utilized = Set(utilized + input.amount);
            }
            FundingTransactionType::Commitment => {
                funding.funds_committed = Set(committed + input.amount);
            }
            FundingTransactionType::Adjustment => {}
        }
        funding.updated_at = Set(now);
        funding.update(&txn).await?;

        txn.commit().await?;

        Ok(row)
    }

    /// Lists a record's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        funding_id: Uuid,
    ) -> Result<Vec<funding_transactions::Model>, DbErr> {
        funding_transactions::Entity::find()
            .filter(funding_transactions::Column::FundingId.eq(funding_id))
            .order_by_desc(funding_transactions::Column::TransactionDate)
            .all(&self.db)
            .await
    }

    /// Hard-deletes a funding record. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = project_funding::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
