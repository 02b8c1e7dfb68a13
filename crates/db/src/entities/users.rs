//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    /// ISO 4217 display-currency preference.
    pub currency: String,
    pub can_manage_accounts: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::revenue_reports::Entity")]
    RevenueReports,
    #[sea_orm(has_many = "super::royalty_entries::Entity")]
    RoyaltyEntries,
    #[sea_orm(has_many = "super::withdrawals::Entity")]
    Withdrawals,
    #[sea_orm(has_many = "super::labels::Entity")]
    Labels,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::revenue_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueReports.def()
    }
}

impl Related<super::royalty_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoyaltyEntries.def()
    }
}

impl Related<super::withdrawals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Withdrawals.def()
    }
}

impl Related<super::labels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Labels.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
