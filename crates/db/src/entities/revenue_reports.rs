//! `SeaORM` Entity for revenue_reports table.
//!
//! One row per uploaded periodic statement. Snapshot gross totals derive
//! from these rows; the royalty ledger only backs the detail views.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub period_start: Date,
    pub period_end: Date,
    pub gross_revenue: Decimal,
    /// Storage key of the archived statement file.
    pub file_key: String,
    pub filename: String,
    /// Whether detail-row expansion into the royalty ledger completed.
    /// False after a partial ingestion failure.
    pub ledger_expanded: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
