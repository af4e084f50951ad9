//! `SeaORM` Entity for quality/HSE reports.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ComplianceStatus, QaQcStatus, QualityReportType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quality_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub section_id: Option<Uuid>,
    pub report_type: QualityReportType,
    pub test_date: Date,
    pub spec_compliance: ComplianceStatus,
    pub environmental_compliance: ComplianceStatus,
    pub social_compliance: ComplianceStatus,
    pub qa_qc_status: QaQcStatus,
    /// JSON array of deficiency descriptions.
    pub deficiencies: Json,
    /// JSON array of corrective actions.
    pub corrective_actions: Json,
    pub follow_up_required: bool,
    pub follow_up_date: Option<Date>,
    pub inspector_id: Option<Uuid>,
    pub notes: Option<String>,
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
        from = "Column::InspectorId",
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
