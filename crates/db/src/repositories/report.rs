//! Revenue report repository.
//!
//! Ingestion is two-phase: the report row is inserted first, then its
//! detail rows are expanded into the royalty ledger and the report is
//! flagged `ledger_expanded`. A failed expansion leaves the report behind
//! with the flag unset so snapshot totals stay correct and the ledger can
//! be repaired later.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use soundledger_core::royalty::{MonthKey, MonthlyRevenue};
use uuid::Uuid;

use crate::entities::revenue_reports;
use crate::repositories::royalty::{
    CreateRoyaltyInput, RoyaltyRepository, REPORT_ENTRY_DESCRIPTION,
};

/// Error types for revenue report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report not found.
    #[error("Revenue report not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A single detail row from an uploaded statement.
#[derive(Debug, Clone)]
pub struct ReportEntryInput {
    /// Row amount.
    pub amount: Decimal,
    /// Date the revenue was earned.
    pub entry_date: NaiveDate,
    /// Revenue source (platform or distributor name).
    pub source: String,
}

/// Input for ingesting a revenue report.
#[derive(Debug, Clone)]
pub struct CreateReportInput {
    /// Client account the report belongs to.
    pub client_id: Uuid,
    /// First day of the reporting period.
    pub period_start: NaiveDate,
    /// Last day of the reporting period.
    pub period_end: NaiveDate,
    /// Gross revenue for the period.
    pub gross_revenue: Decimal,
    /// Storage key of the archived statement file.
    pub file_key: String,
    /// Original filename of the uploaded statement.
    pub filename: String,
    /// Detail rows to expand into the royalty ledger.
    pub entries: Vec<ReportEntryInput>,
}

/// Patch for updating a report's header fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateReportInput {
    /// New client assignment, if reassigning a misfiled report.
    pub client_id: Option<Uuid>,
    /// New period start, if changing.
    pub period_start: Option<NaiveDate>,
    /// New period end, if changing.
    pub period_end: Option<NaiveDate>,
    /// New gross revenue, if changing.
    pub gross_revenue: Option<Decimal>,
}

/// Revenue report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ingests a revenue report.
    ///
    /// Phase one inserts the report row with `ledger_expanded` unset.
    /// Phase two expands the detail rows into the royalty ledger under the
    /// report marker description and flips the flag. An expansion failure
    /// is logged and swallowed: the report row is the source of truth for
    /// snapshot totals, so it must survive a partial ingestion.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report row itself cannot be inserted.
    pub async fn ingest(
        &self,
        input: CreateReportInput,
    ) -> Result<revenue_reports::Model, ReportError> {
        let report = revenue_reports::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(input.client_id),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            gross_revenue: Set(input.gross_revenue),
            file_key: Set(input.file_key),
            filename: Set(input.filename),
            ledger_expanded: Set(false),
            created_at: Set(Utc::now().into()),
        };

        let report = report.insert(&self.db).await?;

        match self.expand_ledger(&report, &input.entries).await {
            Ok(expanded) => Ok(expanded),
            Err(err) => {
                tracing::warn!(
                    report_id = %report.id,
                    client_id = %report.client_id,
                    error = %err,
                    "ledger expansion failed, report kept without detail rows"
                );
                Ok(report)
            }
        }
    }

    async fn expand_ledger(
        &self,
        report: &revenue_reports::Model,
        entries: &[ReportEntryInput],
    ) -> Result<revenue_reports::Model, DbErr> {
        let inputs: Vec<CreateRoyaltyInput> = entries
            .iter()
            .map(|e| CreateRoyaltyInput {
                client_id: report.client_id,
                amount: e.amount,
                entry_date: e.entry_date,
                source: e.source.clone(),
                description: REPORT_ENTRY_DESCRIPTION.to_string(),
            })
            .collect();

        RoyaltyRepository::create_bulk_on(&self.db, &inputs)
            .await
            .map_err(|err| match err {
                crate::repositories::royalty::RoyaltyError::Database(db) => db,
                other => DbErr::Custom(other.to_string()),
            })?;

        let mut active: revenue_reports::ActiveModel = report.clone().into();
        active.ledger_expanded = Set(true);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Finds a report by ID.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` if no report exists with the given ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<revenue_reports::Model, ReportError> {
        revenue_reports::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ReportError::NotFound(id))
    }

    /// Lists all reports, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<revenue_reports::Model>, ReportError> {
        let reports = revenue_reports::Entity::find()
            .order_by_desc(revenue_reports::Column::PeriodEnd)
            .all(&self.db)
            .await?;
        Ok(reports)
    }

    /// Lists a client's reports, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<revenue_reports::Model>, ReportError> {
        let reports = revenue_reports::Entity::find()
            .filter(revenue_reports::Column::ClientId.eq(client_id))
            .order_by_desc(revenue_reports::Column::PeriodEnd)
            .all(&self.db)
            .await?;
        Ok(reports)
    }

    /// Updates a report's header fields.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` if no report exists with the given ID.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateReportInput,
    ) -> Result<revenue_reports::Model, ReportError> {
        let report = self.find_by_id(id).await?;

        let active = Self::apply_patch(report, patch);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    fn apply_patch(
        report: revenue_reports::Model,
        patch: UpdateReportInput,
    ) -> revenue_reports::ActiveModel {
        let mut active: revenue_reports::ActiveModel = report.into();
        if let Some(client) = patch.client_id {
            active.client_id = Set(client);
        }
        if let Some(start) = patch.period_start {
            active.period_start = Set(start);
        }
        if let Some(end) = patch.period_end {
            active.period_end = Set(end);
        }
        if let Some(gross) = patch.gross_revenue {
            active.gross_revenue = Set(gross);
        }
        active
    }

    /// Deletes a report and returns the deleted row so the caller can
    /// clean up its archived statement file and cascade the ledger.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` if no report exists with the given ID.
    pub async fn delete(&self, id: Uuid) -> Result<revenue_reports::Model, ReportError> {
        let report = self.find_by_id(id).await?;

        revenue_reports::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(report)
    }

    /// Sums gross revenue across all of a client's reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn total_gross_for_client(&self, client_id: Uuid) -> Result<Decimal, ReportError> {
        let grosses = revenue_reports::Entity::find()
            .filter(revenue_reports::Column::ClientId.eq(client_id))
            .select_only()
            .column(revenue_reports::Column::GrossRevenue)
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?;

        Ok(grosses.iter().sum())
    }

    /// Buckets a client's reports into per-month gross totals, ordered by
    /// month ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn monthly_gross_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<MonthlyRevenue>, ReportError> {
        let reports = revenue_reports::Entity::find()
            .filter(revenue_reports::Column::ClientId.eq(client_id))
            .all(&self.db)
            .await?;

        Ok(monthly_gross_totals(&reports))
    }
}

/// Folds report rows into per-month gross totals keyed on the period start.
#[must_use]
pub fn monthly_gross_totals(reports: &[revenue_reports::Model]) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    for report in reports {
        let key = MonthKey::from_date(report.period_start);
        *buckets.entry(key).or_insert(Decimal::ZERO) += report.gross_revenue;
    }

    buckets
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue { month, revenue })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    fn report(period_start: NaiveDate, gross: Decimal) -> revenue_reports::Model {
        let period_end = period_start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(period_start);
        revenue_reports::Model {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            period_start,
            period_end,
            gross_revenue: gross,
            file_key: "reports/test".to_string(),
            filename: "statement.csv".to_string(),
            ledger_expanded: true,
            created_at: chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().into(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn patch_reassigns_client() {
        use sea_orm::ActiveValue;

        let original = report(date(2026, 3, 1), dec!(100.00));
        let new_client = Uuid::new_v4();
        let patch = UpdateReportInput {
            client_id: Some(new_client),
            ..Default::default()
        };

        let active = ReportRepository::apply_patch(original, patch);

        assert!(matches!(active.client_id, ActiveValue::Set(id) if id == new_client));
        assert!(matches!(active.period_start, ActiveValue::Unchanged(_)));
        assert!(matches!(active.gross_revenue, ActiveValue::Unchanged(_)));
    }

    #[test]
    fn patch_leaves_client_when_unset() {
        use sea_orm::ActiveValue;

        let original = report(date(2026, 3, 1), dec!(100.00));
        let patch = UpdateReportInput {
            gross_revenue: Some(dec!(250.00)),
            ..Default::default()
        };

        let active = ReportRepository::apply_patch(original, patch);

        assert!(matches!(active.client_id, ActiveValue::Unchanged(_)));
        assert!(matches!(active.gross_revenue, ActiveValue::Set(g) if g == dec!(250.00)));
    }

    #[test]
    fn buckets_reports_by_period_start_month() {
        let reports = vec![
            report(date(2026, 3, 31), dec!(100.00)),
            report(date(2026, 3, 15), dec!(50.00)),
            report(date(2026, 5, 31), dec!(200.00)),
        ];

        let totals = monthly_gross_totals(&reports);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].month, MonthKey::new(2026, 3));
        assert_eq!(totals[0].revenue, dec!(150.00));
        assert_eq!(totals[1].month, MonthKey::new(2026, 5));
        assert_eq!(totals[1].revenue, dec!(200.00));
    }

    #[test]
    fn empty_reports_produce_no_buckets() {
        assert!(monthly_gross_totals(&[]).is_empty());
    }

    #[test]
    fn months_are_ascending() {
        let reports = vec![
            report(date(2026, 12, 31), dec!(1.00)),
            report(date(2025, 1, 31), dec!(2.00)),
            report(date(2026, 6, 30), dec!(3.00)),
        ];

        let totals = monthly_gross_totals(&reports);
        let months: Vec<MonthKey> = totals.iter().map(|t| t.month).collect();
        assert_eq!(
            months,
            vec![
                MonthKey::new(2025, 1),
                MonthKey::new(2026, 6),
                MonthKey::new(2026, 12)
            ]
        );
    }
}
