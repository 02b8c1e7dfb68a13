//! Withdrawal repository.
//!
//! Requests start pending and are decided exactly once. The balance check
//! before a request is advisory only; approval is the admin's call.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::WithdrawalStatus, withdrawals};

/// Error types for withdrawal operations.
#[derive(Debug, thiserror::Error)]
pub enum WithdrawalError {
    /// Withdrawal not found.
    #[error("Withdrawal not found: {0}")]
    NotFound(Uuid),

    /// Withdrawal already decided.
    #[error("Withdrawal {0} has already been processed")]
    AlreadyProcessed(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Terminal decision for a pending withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalDecision {
    /// Approve and pay out.
    Approve,
    /// Reject and release the held amount.
    Reject,
}

impl WithdrawalDecision {
    const fn status(self) -> WithdrawalStatus {
        match self {
            Self::Approve => WithdrawalStatus::Approved,
            Self::Reject => WithdrawalStatus::Rejected,
        }
    }
}

/// Withdrawal repository.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    db: DatabaseConnection,
}

impl WithdrawalRepository {
    /// Creates a new withdrawal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending withdrawal request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        client_id: Uuid,
        amount: Decimal,
    ) -> Result<withdrawals::Model, WithdrawalError> {
        let withdrawal = withdrawals::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(client_id),
            amount: Set(amount),
            status: Set(WithdrawalStatus::Pending),
            requested_at: Set(Utc::now().into()),
            processed_at: Set(None),
        };

        let created = withdrawal.insert(&self.db).await?;
        Ok(created)
    }

    /// Finds a withdrawal by ID.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::NotFound` if no withdrawal exists with the
    /// given ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<withdrawals::Model, WithdrawalError> {
        withdrawals::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(WithdrawalError::NotFound(id))
    }

    /// Applies a terminal decision to a pending withdrawal.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::AlreadyProcessed` if the withdrawal has
    /// already been approved or rejected.
    pub async fn decide(
        &self,
        id: Uuid,
        decision: WithdrawalDecision,
    ) -> Result<withdrawals::Model, WithdrawalError> {
        let withdrawal = self.find_by_id(id).await?;

        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(WithdrawalError::AlreadyProcessed(id));
        }

        let mut active: withdrawals::ActiveModel = withdrawal.into();
        active.status = Set(decision.status());
        active.processed_at = Set(Some(Utc::now().into()));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a withdrawal at any status.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::NotFound` if no withdrawal exists with the
    /// given ID.
    pub async fn delete(&self, id: Uuid) -> Result<(), WithdrawalError> {
        let result = withdrawals::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(WithdrawalError::NotFound(id));
        }
        Ok(())
    }

    /// Lists all withdrawals, newest request first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<withdrawals::Model>, WithdrawalError> {
        let all = withdrawals::Entity::find()
            .order_by_desc(withdrawals::Column::RequestedAt)
            .all(&self.db)
            .await?;
        Ok(all)
    }

    /// Lists a client's withdrawals, newest request first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<withdrawals::Model>, WithdrawalError> {
        let rows = withdrawals::Entity::find()
            .filter(withdrawals::Column::ClientId.eq(client_id))
            .order_by_desc(withdrawals::Column::RequestedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Sums a client's withdrawals with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn sum_for_client(
        &self,
        client_id: Uuid,
        status: WithdrawalStatus,
    ) -> Result<Decimal, WithdrawalError> {
        let rows = withdrawals::Entity::find()
            .filter(withdrawals::Column::ClientId.eq(client_id))
            .filter(withdrawals::Column::Status.eq(status))
            .all(&self.db)
            .await?;

        Ok(rows.iter().map(|w| w.amount).sum())
    }
}
