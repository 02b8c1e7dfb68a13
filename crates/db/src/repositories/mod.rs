//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod label;
pub mod notification;
pub mod reconciliation;
pub mod report;
pub mod royalty;
pub mod user;
pub mod withdrawal;

pub use label::{CreateLabelInput, LabelError, LabelRepository};
pub use notification::{NotificationKind, NotificationRepository};
pub use reconciliation::{AdminOverview, ReconciliationError, ReconciliationRepository};
pub use report::{CreateReportInput, ReportError, ReportRepository, UpdateReportInput};
pub use royalty::{
    CreateRoyaltyInput, RoyaltyError, RoyaltyRepository, REPORT_ENTRY_DESCRIPTION,
};
pub use user::{UserError, UserRepository};
pub use withdrawal::{WithdrawalDecision, WithdrawalError, WithdrawalRepository};
