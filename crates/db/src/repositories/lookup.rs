//! Cached lookup service for reference data.
//!
//! Every handler that needs provinces or enum vocabularies goes through
//! this repository instead of re-querying per request. The cache holds one
//! entry and is refreshed only through the explicit `refresh`/`invalidate`
//! contract.

use std::sync::Arc;

use moka::future::Cache;
use sea_orm::{ActiveEnum, DatabaseConnection, EntityTrait, Iterable, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use trakim_core::reports::ReportKind;

use crate::entities::{
    provinces,
    sea_orm_active_enums::{
        AccessLevel, CertificationLevel, ComplianceStatus, ContractStatus, FundingStatus,
        FundingTransactionType, MilestoneCategory, MilestoneStatus, PointStatus, ProjectStatus,
        QaQcStatus, QualityReportType, RoadSide, ScheduleStatus, SectionStatus, UserRole,
        WorkPhase,
    },
};

/// Error types for lookup operations.
///
/// Holds the database message as a string so cached errors stay cloneable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// One province option.
#[derive(Debug, Clone, Serialize)]
pub struct ProvinceOption {
    /// Province ID.
    pub id: Uuid,
    /// Province name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Region name.
    pub region: String,
}

/// The full reference-data set served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LookupData {
    /// Provinces, by name.
    pub provinces: Vec<ProvinceOption>,
    /// User roles.
    pub roles: Vec<String>,
    /// Access levels.
    pub access_levels: Vec<String>,
    /// Project statuses.
    pub project_statuses: Vec<String>,
    /// Section statuses.
    pub section_statuses: Vec<String>,
    /// Contractor certification levels.
    pub certification_levels: Vec<String>,
    /// Contract statuses.
    pub contract_statuses: Vec<String>,
    /// Work phases.
    pub work_phases: Vec<String>,
    /// Road sides.
    pub road_sides: Vec<String>,
    /// GPS point statuses.
    pub point_statuses: Vec<String>,
    /// Quality report types.
    pub quality_report_types: Vec<String>,
    /// Compliance statuses.
    pub compliance_statuses: Vec<String>,
    /// QA/QC statuses.
    pub qa_qc_statuses: Vec<String>,
    /// Milestone categories.
    pub milestone_categories: Vec<String>,
    /// Milestone statuses.
    pub milestone_statuses: Vec<String>,
    /// Schedule statuses.
    pub schedule_statuses: Vec<String>,
    /// Funding statuses.
    pub funding_statuses: Vec<String>,
    /// Funding transaction types.
    pub funding_transaction_types: Vec<String>,
    /// Report types.
    pub report_types: Vec<String>,
}

/// Cached lookup repository.
#[derive(Clone)]
pub struct LookupRepository {
    db: DatabaseConnection,
    cache: Cache<(), Arc<LookupData>>,
}

impl std::fmt::Debug for LookupRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupRepository")
            .field("db", &self.db)
            .field("cache", &"[moka cache]")
            .finish()
    }
}

impl LookupRepository {
    /// Creates a new lookup repository with an empty cache.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cache: Cache::new(1),
        }
    }

    /// Returns the reference data, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying province query fails.
    pub async fn get(&self) -> Result<Arc<LookupData>, LookupError> {
        self.cache
            .try_get_with((), self.load())
            .await
            .map_err(|e: Arc<LookupError>| (*e).clone())
    }

    /// Drops the cached entry; the next `get` reloads from the database.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }

    /// Invalidates and immediately reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying province query fails.
    pub async fn refresh(&self) -> Result<Arc<LookupData>, LookupError> {
        self.invalidate().await;
        self.get().await
    }

    async fn load(&self) -> Result<Arc<LookupData>, LookupError> {
        let province_rows = provinces::Entity::find()
            .order_by_asc(provinces::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LookupError::Database(e.to_string()))?;

        tracing::debug!(provinces = province_rows.len(), "Loaded lookup reference data");

        let provinces = province_rows
            .into_iter()
            .map(|p| ProvinceOption {
                id: p.id,
                name: p.name,
                code: p.code,
                region: p.region,
            })
            .collect();

        Ok(Arc::new(LookupData {
            provinces,
            roles: enum_values::<UserRole>(),
            access_levels: enum_values::<AccessLevel>(),
            project_statuses: enum_values::<ProjectStatus>(),
            section_statuses: enum_values::<SectionStatus>(),
            certification_levels: enum_values::<CertificationLevel>(),
            contract_statuses: enum_values::<ContractStatus>(),
            work_phases: enum_values::<WorkPhase>(),
            road_sides: enum_values::<RoadSide>(),
            point_statuses: enum_values::<PointStatus>(),
            quality_report_types: enum_values::<QualityReportType>(),
            compliance_statuses: enum_values::<ComplianceStatus>(),
            qa_qc_statuses: enum_values::<QaQcStatus>(),
            milestone_categories: enum_values::<MilestoneCategory>(),
            milestone_statuses: enum_values::<MilestoneStatus>(),
            schedule_statuses: enum_values::<ScheduleStatus>(),
            funding_statuses: enum_values::<FundingStatus>(),
            funding_transaction_types: enum_values::<FundingTransactionType>(),
            report_types: ReportKind::all().iter().map(|k| k.as_str().to_string()).collect(),
        }))
    }
}

/// Collects an active enum's wire values in declaration order.
fn enum_values<E>() -> Vec<String>
where
    E: ActiveEnum<Value = String> + Iterable,
{
    E::iter().map(|v| v.to_value()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_values_are_wire_strings() {
        let statuses = enum_values::<ProjectStatus>();
        assert_eq!(
            statuses,
            vec![
                "planning",
                "tendering",
                "in_progress",
                "on_hold",
                "completed",
                "cancelled"
            ]
        );
    }

    #[test]
    fn report_kinds_cover_all_six_types() {
        let kinds: Vec<String> = ReportKind::all()
            .iter()
            .map(|k| k.as_str().to_string())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "overview",
                "progress",
                "contractor",
                "province",
                "gps",
                "financial"
            ]
        );
    }
}
