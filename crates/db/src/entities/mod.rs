//! `SeaORM` entity definitions.

pub mod labels;
pub mod notifications;
pub mod revenue_reports;
pub mod royalty_entries;
pub mod sea_orm_active_enums;
pub mod users;
pub mod withdrawals;
