//! Revenue report routes.
//!
//! Admins ingest, correct, and delete reports; clients list their own.
//! Deleting a report also removes its archived statement file and the
//! ledger rows derived from it.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use soundledger_db::{
    NotificationRepository, ReportRepository, RoyaltyRepository,
    entities::revenue_reports,
    repositories::{
        notification::NotificationKind,
        report::{CreateReportInput, ReportEntryInput, ReportError, UpdateReportInput},
    },
};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reports", post(create_report))
        .route("/admin/reports", get(list_reports))
        .route("/admin/reports/{id}", put(update_report))
        .route("/admin/reports/{id}", delete(delete_report))
        .route("/client/reports", get(list_client_reports))
}

/// Detail row in a report ingestion request.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// Row amount.
    pub amount: Decimal,
    /// Date the revenue was earned.
    pub entry_date: NaiveDate,
    /// Revenue source (platform or distributor name), if known.
    #[serde(default)]
    pub source: Option<String>,
}

/// Request body for ingesting a report.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
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
    #[serde(default)]
    pub entries: Vec<EntryRequest>,
}

/// Request body for correcting a report's header.
#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    /// New client assignment, if reassigning a misfiled report.
    pub client_id: Option<Uuid>,
    /// New period start, if changing.
    pub period_start: Option<NaiveDate>,
    /// New period end, if changing.
    pub period_end: Option<NaiveDate>,
    /// New gross revenue, if changing.
    pub gross_revenue: Option<Decimal>,
}

/// Report in responses.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// Report ID.
    pub id: Uuid,
    /// Client account.
    pub client_id: Uuid,
    /// First day of the reporting period.
    pub period_start: String,
    /// Last day of the reporting period.
    pub period_end: String,
    /// Gross revenue for the period.
    pub gross_revenue: String,
    /// Original filename of the uploaded statement.
    pub filename: String,
    /// Whether detail-row expansion completed.
    pub ledger_expanded: bool,
    /// Ingestion timestamp.
    pub created_at: String,
}

impl From<revenue_reports::Model> for ReportResponse {
    fn from(m: revenue_reports::Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            period_start: m.period_start.to_string(),
            period_end: m.period_end.to_string(),
            gross_revenue: m.gross_revenue.to_string(),
            filename: m.filename,
            ledger_expanded: m.ledger_expanded,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Checks the correctable header fields, returning the message for the
/// first violated rule. Period ordering is only checked when both ends are
/// present; partial period updates are backstopped by the table constraint.
fn header_violation(
    period_start: Option<NaiveDate>,
    period_end: Option<NaiveDate>,
    gross_revenue: Option<Decimal>,
) -> Option<&'static str> {
    if let (Some(start), Some(end)) = (period_start, period_end) {
        if end < start {
            return Some("period_end must not precede period_start");
        }
    }
    if let Some(gross) = gross_revenue {
        if gross < Decimal::ZERO {
            return Some("gross_revenue must not be negative");
        }
    }
    None
}

fn report_error_response(e: &ReportError) -> axum::response::Response {
    match e {
        ReportError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Revenue report not found: {id}")
            })),
        )
            .into_response(),
        ReportError::Database(db) => {
            error!(error = %db, "report operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// Ingests a revenue report and expands its detail rows into the ledger.
async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateReportRequest>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    if let Some(message) = header_violation(
        Some(body.period_start),
        Some(body.period_end),
        Some(body.gross_revenue),
    ) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": message
            })),
        )
            .into_response();
    }

    let repo = ReportRepository::new(state.db.as_ref().clone());
    let input = CreateReportInput {
        client_id: body.client_id,
        period_start: body.period_start,
        period_end: body.period_end,
        gross_revenue: body.gross_revenue,
        file_key: body.file_key,
        filename: body.filename,
        entries: body
            .entries
            .into_iter()
            .map(|e| ReportEntryInput {
                amount: e.amount,
                entry_date: e.entry_date,
                source: e.source.unwrap_or_default(),
            })
            .collect(),
    };

    match repo.ingest(input).await {
        Ok(report) => {
            notify_revenue(&state, &report);
            (StatusCode::CREATED, Json(ReportResponse::from(report))).into_response()
        }
        Err(e) => report_error_response(&e),
    }
}

/// Writes a best-effort notification after an ingestion commits.
fn notify_revenue(state: &AppState, report: &revenue_reports::Model) {
    let repo = NotificationRepository::new(state.db.as_ref().clone());
    let user_id = report.client_id;
    let message = format!(
        "New revenue report for {} through {}",
        report.period_start, report.period_end
    );

    tokio::spawn(async move {
        if let Err(e) = repo.create(user_id, NotificationKind::Revenue, message).await {
            warn!(user_id = %user_id, error = %e, "revenue notification write failed");
        }
    });
}

/// Lists all reports.
async fn list_reports(State(state): State<AppState>, auth: AuthUser) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = ReportRepository::new(state.db.as_ref().clone());
    match repo.list().await {
        Ok(reports) => {
            let out: Vec<ReportResponse> = reports.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => report_error_response(&e),
    }
}

/// Lists the authenticated client's reports.
async fn list_client_reports(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    let repo = ReportRepository::new(state.db.as_ref().clone());
    match repo.list_for_client(auth.user_id()).await {
        Ok(reports) => {
            let out: Vec<ReportResponse> = reports.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => report_error_response(&e),
    }
}

/// Corrects a report's header fields.
async fn update_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateReportRequest>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    if let Some(message) =
        header_violation(body.period_start, body.period_end, body.gross_revenue)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": message
            })),
        )
            .into_response();
    }

    let repo = ReportRepository::new(state.db.as_ref().clone());
    let patch = UpdateReportInput {
        client_id: body.client_id,
        period_start: body.period_start,
        period_end: body.period_end,
        gross_revenue: body.gross_revenue,
    };

    match repo.update(id, patch).await {
        Ok(report) => Json(ReportResponse::from(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// Deletes a report, its derived ledger rows, and its archived file.
async fn delete_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = ReportRepository::new(state.db.as_ref().clone());
    let report = match repo.delete(id).await {
        Ok(report) => report,
        Err(e) => return report_error_response(&e),
    };

    // Cascade the marker-scoped ledger rows. Failure here leaves orphans
    // but must not resurrect the already-deleted report.
    let royalties = RoyaltyRepository::new(state.db.as_ref().clone());
    if let Err(e) = royalties
        .delete_report_derived(report.client_id, report.period_start, report.period_end)
        .await
    {
        warn!(report_id = %report.id, error = %e, "derived ledger cleanup failed");
    }

    if let Some(storage) = &state.storage {
        if let Err(e) = storage.delete(&report.file_key).await {
            warn!(report_id = %report.id, key = %report.file_key, error = %e, "statement file cleanup failed");
        }
    }

    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn negative_gross_is_rejected_on_ingestion() {
        let violation = header_violation(
            Some(date(2026, 3, 1)),
            Some(date(2026, 3, 31)),
            Some(dec!(-0.01)),
        );
        assert_eq!(violation, Some("gross_revenue must not be negative"));
    }

    #[test]
    fn negative_gross_is_rejected_on_correction() {
        let violation = header_violation(None, None, Some(dec!(-500.00)));
        assert_eq!(violation, Some("gross_revenue must not be negative"));
    }

    #[test]
    fn inverted_period_is_rejected() {
        let violation = header_violation(
            Some(date(2026, 4, 1)),
            Some(date(2026, 3, 31)),
            Some(dec!(100.00)),
        );
        assert_eq!(violation, Some("period_end must not precede period_start"));
    }

    #[test]
    fn zero_gross_and_ordered_period_pass() {
        let violation = header_violation(
            Some(date(2026, 3, 1)),
            Some(date(2026, 3, 31)),
            Some(Decimal::ZERO),
        );
        assert_eq!(violation, None);
    }

    #[test]
    fn empty_patch_passes() {
        assert_eq!(header_violation(None, None, None), None);
    }
}
