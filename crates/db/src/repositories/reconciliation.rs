//! Reconciliation engine: assembles financial snapshots and chart series
//! from the report, label, and withdrawal tables.
//!
//! Reads fan out concurrently and fold in Rust; the arithmetic itself
//! lives in `soundledger_core` so it stays testable without a database.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use soundledger_core::royalty::{
    compute_snapshot, synthesize_series, ChartPoint, ChartView, FinancialSnapshot, SnapshotInputs,
};
use uuid::Uuid;

use crate::entities::{
    revenue_reports, sea_orm_active_enums::{UserRole, WithdrawalStatus}, users, withdrawals,
};
use crate::repositories::{
    label::{LabelError, LabelRepository},
    report::{ReportError, ReportRepository},
    withdrawal::{WithdrawalError, WithdrawalRepository},
};

/// Error types for reconciliation queries.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    /// Share resolution failed.
    #[error(transparent)]
    Label(#[from] LabelError),

    /// Report aggregation failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Withdrawal aggregation failed.
    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminOverview {
    /// Gross revenue summed across every report.
    pub total_revenue: Decimal,
    /// Number of client accounts.
    pub total_clients: u64,
    /// Number of withdrawals awaiting a decision.
    pub pending_withdrawals: u64,
    /// Amount locked in pending withdrawals.
    pub pending_amount: Decimal,
}

/// Reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    labels: LabelRepository,
    reports: ReportRepository,
    withdrawals: WithdrawalRepository,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            labels: LabelRepository::new(db.clone()),
            reports: ReportRepository::new(db.clone()),
            withdrawals: WithdrawalRepository::new(db.clone()),
            db,
        }
    }

    /// Computes a client's financial snapshot.
    ///
    /// Fans out the four source queries concurrently, then derives net,
    /// deductions, and balance with exact decimal arithmetic.
    ///
    /// # Errors
    ///
    /// Returns an error if any source query fails.
    pub async fn snapshot(&self, client_id: Uuid) -> Result<FinancialSnapshot, ReconciliationError> {
        let (share, total_gross, total_withdrawn, pending_amount) = tokio::try_join!(
            async { self.labels.resolve_for_client(client_id).await.map_err(ReconciliationError::from) },
            async { self.reports.total_gross_for_client(client_id).await.map_err(ReconciliationError::from) },
            async {
                self.withdrawals
                    .sum_for_client(client_id, WithdrawalStatus::Approved)
                    .await
                    .map_err(ReconciliationError::from)
            },
            async {
                self.withdrawals
                    .sum_for_client(client_id, WithdrawalStatus::Pending)
                    .await
                    .map_err(ReconciliationError::from)
            },
        )?;

        Ok(compute_snapshot(SnapshotInputs {
            total_gross,
            share,
            total_withdrawn,
            pending_amount,
        }))
    }

    /// Builds a client's revenue chart series for the requested view.
    ///
    /// Buckets the client's reports by month, then synthesizes a
    /// fixed-width, gap-filled window anchored at the later of today and
    /// the most recent report month.
    ///
    /// # Errors
    ///
    /// Returns an error if the report query fails.
    pub async fn chart_series(
        &self,
        client_id: Uuid,
        view: ChartView,
    ) -> Result<Vec<ChartPoint>, ReconciliationError> {
        let monthly = self.reports.monthly_gross_for_client(client_id).await?;
        Ok(synthesize_series(&monthly, view, today()))
    }

    /// Computes platform-wide totals for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn admin_overview(&self) -> Result<AdminOverview, ReconciliationError> {
        let (reports, clients, pending) = tokio::try_join!(
            async {
                revenue_reports::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(ReconciliationError::from)
            },
            async {
                users::Entity::find()
                    .filter(users::Column::Role.eq(UserRole::Client))
                    .all(&self.db)
                    .await
                    .map_err(ReconciliationError::from)
            },
            async {
                withdrawals::Entity::find()
                    .filter(withdrawals::Column::Status.eq(WithdrawalStatus::Pending))
                    .all(&self.db)
                    .await
                    .map_err(ReconciliationError::from)
            },
        )?;

        Ok(AdminOverview {
            total_revenue: reports.iter().map(|r| r.gross_revenue).sum(),
            total_clients: clients.len() as u64,
            pending_withdrawals: pending.len() as u64,
            pending_amount: pending.iter().map(|w| w.amount).sum(),
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
