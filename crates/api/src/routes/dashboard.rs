//! Dashboard routes for client and admin financial stats.
//!
//! Read paths degrade instead of failing: a broken source query logs a
//! warning and returns zeroed figures so the dashboard always renders.
//! Write paths elsewhere surface their errors normally.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AppState, middleware::AuthUser};
use soundledger_core::royalty::{synthesize_series, ChartPoint, ChartView, FinancialSnapshot};
use soundledger_db::ReconciliationRepository;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/client/stats", get(get_client_stats))
        .route("/client/chart-data", get(get_chart_data))
        .route("/admin/stats", get(get_admin_stats))
}

/// Query parameters for chart data.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Chart window: "yearly" (12 buckets); anything else, including an
    /// absent or unrecognized value, falls back to "monthly" (4 buckets).
    #[serde(default, deserialize_with = "lenient_view")]
    pub view: ChartView,
}

fn lenient_view<'de, D>(deserializer: D) -> Result<ChartView, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(if raw.eq_ignore_ascii_case("yearly") {
        ChartView::Yearly
    } else {
        ChartView::Monthly
    })
}

/// Client financial snapshot response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Gross revenue across all reports.
    pub total_gross: String,
    /// Client's net share of gross revenue.
    pub total_net: String,
    /// Platform share retained from gross revenue.
    pub total_deductions: String,
    /// Sum of approved withdrawals.
    pub total_withdrawn: String,
    /// Amount locked in pending withdrawals.
    pub pending_amount: String,
    /// Net minus withdrawn minus pending.
    pub balance: String,
    /// Revenue-share percentage applied.
    pub share_percent: String,
    /// Resolved label name, if any.
    pub label_name: Option<String>,
}

impl From<FinancialSnapshot> for StatsResponse {
    fn from(s: FinancialSnapshot) -> Self {
        Self {
            total_gross: s.total_gross.to_string(),
            total_net: s.total_net.to_string(),
            total_deductions: s.total_deductions.to_string(),
            total_withdrawn: s.total_withdrawn.to_string(),
            pending_amount: s.pending_amount.to_string(),
            balance: s.balance.to_string(),
            share_percent: s.share_percent.to_string(),
            label_name: s.label_name,
        }
    }
}

/// Chart point in response.
#[derive(Debug, Serialize)]
pub struct ChartPointResponse {
    /// Bucket label, "YYYY-MM".
    pub period: String,
    /// Gross revenue in the bucket.
    pub revenue: String,
}

impl From<ChartPoint> for ChartPointResponse {
    fn from(p: ChartPoint) -> Self {
        Self {
            period: p.period,
            revenue: p.revenue.to_string(),
        }
    }
}

/// Returns the authenticated client's financial snapshot.
async fn get_client_stats(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.db.as_ref().clone());

    let snapshot = match repo.snapshot(auth.user_id()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(client_id = %auth.user_id(), error = %e, "snapshot failed, serving zeroed stats");
            FinancialSnapshot::zeroed()
        }
    };

    Json(StatsResponse::from(snapshot))
}

/// Returns the authenticated client's revenue chart series.
async fn get_chart_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.db.as_ref().clone());

    let series = match repo.chart_series(auth.user_id(), query.view).await {
        Ok(series) => series,
        Err(e) => {
            warn!(client_id = %auth.user_id(), error = %e, "chart query failed, serving empty window");
            synthesize_series(&[], query.view, Local::now().date_naive())
        }
    };

    let points: Vec<ChartPointResponse> = series.into_iter().map(Into::into).collect();
    Json(points)
}

/// Platform-wide totals response.
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    /// Gross revenue summed across every report.
    pub total_revenue: String,
    /// Number of client accounts.
    pub total_clients: u64,
    /// Number of withdrawals awaiting a decision.
    pub pending_withdrawals: u64,
    /// Amount locked in pending withdrawals.
    pub pending_amount: String,
}

/// Returns platform-wide totals for the admin dashboard.
async fn get_admin_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = ReconciliationRepository::new(state.db.as_ref().clone());

    let overview = match repo.admin_overview().await {
        Ok(overview) => overview,
        Err(e) => {
            warn!(error = %e, "admin overview failed, serving zeroed totals");
            return Json(AdminStatsResponse {
                total_revenue: "0".to_string(),
                total_clients: 0,
                pending_withdrawals: 0,
                pending_amount: "0".to_string(),
            })
            .into_response();
        }
    };

    Json(AdminStatsResponse {
        total_revenue: overview.total_revenue.to_string(),
        total_clients: overview.total_clients,
        pending_withdrawals: overview.pending_withdrawals,
        pending_amount: overview.pending_amount.to_string(),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse_view(value: serde_json::Value) -> ChartView {
        serde_json::from_value::<ChartQuery>(value).unwrap().view
    }

    #[test]
    fn yearly_view_is_recognized() {
        assert_eq!(parse_view(json!({"view": "yearly"})), ChartView::Yearly);
        assert_eq!(parse_view(json!({"view": "YEARLY"})), ChartView::Yearly);
    }

    #[test]
    fn unknown_view_falls_back_to_monthly() {
        assert_eq!(parse_view(json!({"view": "weekly"})), ChartView::Monthly);
        assert_eq!(parse_view(json!({"view": ""})), ChartView::Monthly);
    }

    #[test]
    fn absent_view_defaults_to_monthly() {
        assert_eq!(parse_view(json!({})), ChartView::Monthly);
    }
}
