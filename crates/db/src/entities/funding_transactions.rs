//! `SeaORM` Entity for funding transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::FundingTransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "funding_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub funding_id: Uuid,
    pub transaction_type: FundingTransactionType,
    pub amount: Decimal,
    pub transaction_date: Date,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_funding::Entity",
        from = "Column::FundingId",
        to = "super::project_funding::Column::Id"
    )]
    ProjectFunding,
}

impl Related<super::project_funding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectFunding.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
