//! `SeaORM` Entity for the contractors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CertificationLevel;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contractors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub license_number: String,
    pub certification_level: CertificationLevel,
    /// JSON array of specialization strings.
    pub specializations: Json,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contractor_projects::Entity")]
    ContractorProjects,
    #[sea_orm(has_many = "super::project_sections::Entity")]
    ProjectSections,
}

impl Related<super::contractor_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractorProjects.def()
    }
}

impl Related<super::project_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectSections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
