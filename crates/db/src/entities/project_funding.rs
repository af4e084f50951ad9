//! `SeaORM` Entity for project funding records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::FundingStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "project_funding")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub funding_source: String,
    pub budget_allocated: Decimal,
    pub funds_released: Decimal,
    pub funds_utilized: Decimal,
    pub funds_committed: Decimal,
    pub status: FundingStatus,
    pub fiscal_year: i32,
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
    #[sea_orm(has_many = "super::funding_transactions::Entity")]
    FundingTransactions,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::funding_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundingTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
