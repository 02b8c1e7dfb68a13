//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role: administrative staff or label client.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Administrative staff: uploads statements, decides withdrawals.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Label client: views earnings, requests withdrawals.
    #[sea_orm(string_value = "client")]
    Client,
}

/// Withdrawal request lifecycle state.
///
/// Transitions only pending -> approved or pending -> rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdrawal_status")]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Awaiting an administrative decision; counts against the balance.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid out; counts as withdrawn.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Declined; no longer affects the balance.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}
