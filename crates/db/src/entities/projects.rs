//! `SeaORM` Entity for the projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ProjectStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub province_id: Uuid,
    pub status: ProjectStatus,
    /// Total road distance in metres.
    pub total_distance_m: Decimal,
    pub start_latitude: Option<Decimal>,
    pub start_longitude: Option<Decimal>,
    pub end_latitude: Option<Decimal>,
    pub end_longitude: Option<Decimal>,
    pub sponsor: Option<String>,
    pub team_lead: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::provinces::Entity",
        from = "Column::ProvinceId",
        to = "super::provinces::Column::Id"
    )]
    Provinces,
    #[sea_orm(has_many = "super::project_sections::Entity")]
    ProjectSections,
    #[sea_orm(has_many = "super::contractor_projects::Entity")]
    ContractorProjects,
    #[sea_orm(has_many = "super::gps_points::Entity")]
    GpsPoints,
    #[sea_orm(has_many = "super::quality_reports::Entity")]
    QualityReports,
    #[sea_orm(has_many = "super::milestones::Entity")]
    Milestones,
    #[sea_orm(has_many = "super::progress_reports::Entity")]
    ProgressReports,
    #[sea_orm(has_many = "super::project_funding::Entity")]
    ProjectFunding,
    #[sea_orm(has_many = "super::user_project_access::Entity")]
    UserProjectAccess,
}

impl Related<super::provinces::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provinces.def()
    }
}

impl Related<super::project_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectSections.def()
    }
}

impl Related<super::contractor_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractorProjects.def()
    }
}

impl Related<super::gps_points::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GpsPoints.def()
    }
}

impl Related<super::quality_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QualityReports.def()
    }
}

impl Related<super::milestones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Milestones.def()
    }
}

impl Related<super::progress_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgressReports.def()
    }
}

impl Related<super::project_funding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectFunding.def()
    }
}

impl Related<super::user_project_access::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProjectAccess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
