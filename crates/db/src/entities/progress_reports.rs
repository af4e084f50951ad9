//! `SeaORM` Entity for periodic progress reports.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ScheduleStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "progress_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub section_id: Option<Uuid>,
    pub report_date: Date,
    /// Progress at the reporting date (0-100).
    pub current_progress: Decimal,
    /// Progress at the previous report (0-100).
    pub previous_progress: Decimal,
    /// Planned progress at the reporting date (0-100).
    pub planned_progress: Decimal,
    pub schedule_status: ScheduleStatus,
    /// JSON array of completed work descriptions.
    pub works_completed: Json,
    pub issues: Option<String>,
    pub reported_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::project_sections::Entity",
        from = "Column::SectionId",
        to = "super::project_sections::Column::Id"
    )]
    ProjectSections,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReportedBy",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
