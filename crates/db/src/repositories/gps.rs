//! GPS point repository for the append-only field log.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use trakim_shared::types::PageRequest;

use crate::entities::{
    gps_points, projects,
    sea_orm_active_enums::{PointStatus, RoadSide, WorkPhase},
};

/// Error types for GPS operations.
#[derive(Debug, thiserror::Error)]
pub enum GpsError {
    /// Point not found.
    #[error("GPS point not found: {0}")]
    NotFound(Uuid),

    /// Owning project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Coordinate outside valid range.
    #[error("Coordinate out of range: latitude {latitude}, longitude {longitude}")]
    CoordinateOutOfRange {
        /// Offending latitude.
        latitude: Decimal,
        /// Offending longitude.
        longitude: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for logging a GPS point.
#[derive(Debug, Clone)]
pub struct CreateGpsPointInput {
    /// Owning project.
    pub project_id: Uuid,
    /// Section, if known.
    pub section_id: Option<Uuid>,
    /// Contractor performing the works, if known.
    pub contractor_id: Option<Uuid>,
    /// User logging the point.
    pub recorded_by: Option<Uuid>,
    /// Latitude in decimal degrees.
    pub latitude: Decimal,
    /// Longitude in decimal degrees.
    pub longitude: Decimal,
    /// Work phase.
    pub phase: WorkPhase,
    /// Road side.
    pub road_side: RoadSide,
    /// Chainage distance in metres.
    pub distance_m: Option<Decimal>,
    /// Point status; defaults to planned.
    pub status: Option<PointStatus>,
    /// Free-text note.
    pub note: Option<String>,
    /// Observation timestamp; defaults to now.
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Filter for listing GPS points.
#[derive(Debug, Clone, Default)]
pub struct GpsFilter {
    /// Restrict to one project.
    pub project_id: Option<Uuid>,
    /// Restrict to one section.
    pub section_id: Option<Uuid>,
    /// Restrict to one contractor.
    pub contractor_id: Option<Uuid>,
    /// Restrict to one phase.
    pub phase: Option<WorkPhase>,
    /// Restrict to one status.
    pub status: Option<PointStatus>,
    /// Inclusive lower bound on `recorded_at` (whole day).
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `recorded_at` (whole day).
    pub end_date: Option<NaiveDate>,
}

const MAX_LATITUDE: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const MAX_LONGITUDE: Decimal = Decimal::from_parts(180, 0, 0, false, 0);

/// GPS point repository.
#[derive(Debug, Clone)]
pub struct GpsRepository {
    db: DatabaseConnection,
}

impl GpsRepository {
    /// Creates a new GPS repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a point by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<gps_points::Model>, DbErr> {
        gps_points::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists points matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &GpsFilter,
        page: &PageRequest,
    ) -> Result<(Vec<gps_points::Model>, u64), DbErr> {
        let mut query = gps_points::Entity::find();

        if let Some(project_id) = filter.project_id {
            query = query.filter(gps_points::Column::ProjectId.eq(project_id));
        }
        if let Some(section_id) = filter.section_id {
            query = query.filter(gps_points::Column::SectionId.eq(section_id));
        }
        if let Some(contractor_id) = filter.contractor_id {
            query = query.filter(gps_points::Column::ContractorId.eq(contractor_id));
        }
        if let Some(phase) = &filter.phase {
            query = query.filter(gps_points::Column::Phase.eq(phase.clone()));
        }
        if let Some(status) = &filter.status {
            query = query.filter(gps_points::Column::Status.eq(status.clone()));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(gps_points::Column::RecordedAt.gte(day_start(start)));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(gps_points::Column::RecordedAt.lt(day_start(end) + Duration::days(1)));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(gps_points::Column::RecordedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Logs a new GPS point.
    ///
    /// # Errors
    ///
    /// Returns `GpsError::ProjectNotFound` if the project does not exist,
    /// `GpsError::CoordinateOutOfRange` for invalid coordinates, or a
    /// database error.
    pub async fn create(&self, input: CreateGpsPointInput) -> Result<gps_points::Model, GpsError> {
        if input.latitude.abs() > MAX_LATITUDE || input.longitude.abs() > MAX_LONGITUDE {
            return Err(GpsError::CoordinateOutOfRange {
                latitude: input.latitude,
                longitude: input.longitude,
            });
        }

        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await?;
        if project.is_none() {
            return Err(GpsError::ProjectNotFound(input.project_id));
        }

        let now = chrono::Utc::now();

        let point = gps_points::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            section_id: Set(input.section_id),
            contractor_id: Set(input.contractor_id),
            recorded_by: Set(input.recorded_by),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            phase: Set(input.phase),
            road_side: Set(input.road_side),
            distance_m: Set(input.distance_m),
            status: Set(input.status.unwrap_or(PointStatus::Planned)),
            note: Set(input.note),
            recorded_at: Set(input.recorded_at.unwrap_or(now).into()),
            created_at: Set(now.into()),
        };

        Ok(point.insert(&self.db).await?)
    }

    /// Hard-deletes a point. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = gps_points::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

/// Midnight UTC at the start of the given day.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}
