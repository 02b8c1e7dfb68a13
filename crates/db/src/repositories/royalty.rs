//! Royalty ledger repository.
//!
//! Ledger rows are append-only: created individually, in bulk, or as the
//! expansion of an ingested revenue report. Report-derived rows carry the
//! marker description so the report-deletion cascade can find them without
//! a foreign key.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::royalty_entries;

/// Description marker written on ledger rows derived from a revenue report.
/// The report-deletion cascade only removes rows carrying this marker, so
/// manually created entries inside the report period survive.
pub const REPORT_ENTRY_DESCRIPTION: &str = "Monthly Report";

/// Error types for royalty ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum RoyaltyError {
    /// Royalty entry not found.
    #[error("Royalty entry not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a royalty ledger entry.
#[derive(Debug, Clone)]
pub struct CreateRoyaltyInput {
    /// Client account the entry belongs to.
    pub client_id: Uuid,
    /// Entry amount.
    pub amount: Decimal,
    /// Date the revenue was earned.
    pub entry_date: NaiveDate,
    /// Revenue source (platform or distributor name).
    pub source: String,
    /// Free-form description.
    pub description: String,
}

/// Royalty ledger repository.
#[derive(Debug, Clone)]
pub struct RoyaltyRepository {
    db: DatabaseConnection,
}

impl RoyaltyRepository {
    /// Creates a new royalty repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a single ledger entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        input: CreateRoyaltyInput,
    ) -> Result<royalty_entries::Model, RoyaltyError> {
        let entry = Self::to_active_model(&input);
        let created = entry.insert(&self.db).await?;
        Ok(created)
    }

    /// Creates ledger entries in bulk with a single insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_bulk(&self, inputs: &[CreateRoyaltyInput]) -> Result<u64, RoyaltyError> {
        if inputs.is_empty() {
            return Ok(0);
        }

        let models = inputs.iter().map(Self::to_active_model);
        let result = royalty_entries::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await?;
        Ok(result)
    }

    /// Bulk insert on an arbitrary connection, used inside the report
    /// ingestion flow so expansion shares the caller's connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_bulk_on<C: ConnectionTrait>(
        conn: &C,
        inputs: &[CreateRoyaltyInput],
    ) -> Result<u64, RoyaltyError> {
        if inputs.is_empty() {
            return Ok(0);
        }

        let models = inputs.iter().map(Self::to_active_model);
        let result = royalty_entries::Entity::insert_many(models)
            .exec_without_returning(conn)
            .await?;
        Ok(result)
    }

    /// Lists a client's ledger entries, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<royalty_entries::Model>, RoyaltyError> {
        let entries = royalty_entries::Entity::find()
            .filter(royalty_entries::Column::ClientId.eq(client_id))
            .order_by_desc(royalty_entries::Column::EntryDate)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Deletes a single ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `RoyaltyError::NotFound` if no entry exists with the given ID.
    pub async fn delete(&self, id: Uuid) -> Result<(), RoyaltyError> {
        let result = royalty_entries::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RoyaltyError::NotFound(id));
        }
        Ok(())
    }

    /// Deletes report-derived entries for a client within a date range.
    ///
    /// Only rows carrying the report marker description are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete_report_derived(
        &self,
        client_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<u64, RoyaltyError> {
        let result = Self::scoped_delete(client_id, period_start, period_end)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    fn scoped_delete(
        client_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> sea_orm::DeleteMany<royalty_entries::Entity> {
        royalty_entries::Entity::delete_many()
            .filter(royalty_entries::Column::ClientId.eq(client_id))
            .filter(royalty_entries::Column::EntryDate.gte(period_start))
            .filter(royalty_entries::Column::EntryDate.lte(period_end))
            .filter(royalty_entries::Column::Description.eq(REPORT_ENTRY_DESCRIPTION))
    }

    fn to_active_model(input: &CreateRoyaltyInput) -> royalty_entries::ActiveModel {
        royalty_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(input.client_id),
            amount: Set(input.amount),
            entry_date: Set(input.entry_date),
            source: Set(input.source.clone()),
            description: Set(input.description.clone()),
            created_at: Set(Utc::now().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cascade_is_scoped_to_client_period_and_marker() {
        let client = Uuid::new_v4();
        let sql =
            RoyaltyRepository::scoped_delete(client, date(2026, 3, 1), date(2026, 3, 31))
                .build(DbBackend::Postgres)
                .to_string();

        assert!(sql.contains(&format!("'{client}'")));
        assert!(sql.contains(r#""entry_date" >= '2026-03-01'"#));
        assert!(sql.contains(r#""entry_date" <= '2026-03-31'"#));
        assert!(sql.contains(r#""description" = 'Monthly Report'"#));
    }

    #[test]
    fn cascade_conditions_are_conjunctive() {
        let sql = RoyaltyRepository::scoped_delete(
            Uuid::new_v4(),
            date(2026, 3, 1),
            date(2026, 3, 31),
        )
        .build(DbBackend::Postgres)
        .to_string();

        // One AND per extra condition: manual entries inside the period and
        // marker rows outside it must both survive.
        assert_eq!(sql.matches(" AND ").count(), 3);
    }
}
