//! Withdrawal routes.
//!
//! Clients request withdrawals against their computed balance; admins
//! approve or reject. The balance check at request time is advisory: it
//! blocks obvious over-asks but the admin decision is authoritative.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use soundledger_core::royalty::FinancialSnapshot;
use soundledger_db::{
    NotificationRepository, ReconciliationRepository, WithdrawalRepository,
    entities::withdrawals,
    repositories::{
        notification::NotificationKind,
        withdrawal::{WithdrawalDecision, WithdrawalError},
    },
};

/// Creates the withdrawal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/client/withdrawals", post(request_withdrawal))
        .route("/client/withdrawals", get(list_client_withdrawals))
        .route("/admin/withdrawals", get(list_withdrawals))
        .route("/admin/withdrawals/{id}/approve", post(approve_withdrawal))
        .route("/admin/withdrawals/{id}/reject", post(reject_withdrawal))
        .route("/admin/withdrawals/{id}", delete(delete_withdrawal))
}

/// Request body for a withdrawal request.
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalRequest {
    /// Amount to withdraw.
    pub amount: Decimal,
}

/// Withdrawal in responses.
#[derive(Debug, Serialize)]
pub struct WithdrawalResponse {
    /// Withdrawal ID.
    pub id: Uuid,
    /// Client account.
    pub client_id: Uuid,
    /// Requested amount.
    pub amount: String,
    /// Current status.
    pub status: String,
    /// Request timestamp.
    pub requested_at: String,
    /// Decision timestamp, if decided.
    pub processed_at: Option<String>,
}

impl From<withdrawals::Model> for WithdrawalResponse {
    fn from(m: withdrawals::Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            amount: m.amount.to_string(),
            status: format!("{:?}", m.status).to_lowercase(),
            requested_at: m.requested_at.to_rfc3339(),
            processed_at: m.processed_at.map(|t| t.to_rfc3339()),
        }
    }
}

fn withdrawal_error_response(e: &WithdrawalError) -> axum::response::Response {
    match e {
        WithdrawalError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Withdrawal not found: {id}")
            })),
        )
            .into_response(),
        WithdrawalError::AlreadyProcessed(id) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_processed",
                "message": format!("Withdrawal {id} has already been processed")
            })),
        )
            .into_response(),
        WithdrawalError::Database(db) => {
            error!(error = %db, "withdrawal operation failed");
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

/// Advisory gate: a request strictly above the computed balance is refused
/// before any row is written.
fn exceeds_balance(amount: Decimal, snapshot: &FinancialSnapshot) -> bool {
    amount > snapshot.balance
}

/// Creates a pending withdrawal request after an advisory balance check.
async fn request_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateWithdrawalRequest>,
) -> axum::response::Response {
    if body.amount <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Withdrawal amount must be positive"
            })),
        )
            .into_response();
    }

    // Advisory check only: a snapshot failure here must not block the
    // request, and the admin decision remains the authoritative gate.
    let reconciliation = ReconciliationRepository::new(state.db.as_ref().clone());
    match reconciliation.snapshot(auth.user_id()).await {
        Ok(snapshot) if exceeds_balance(body.amount, &snapshot) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "insufficient_balance",
                    "message": format!(
                        "Requested {} exceeds available balance {}",
                        body.amount, snapshot.balance
                    )
                })),
            )
                .into_response();
        }
        Ok(_) => {}
        Err(e) => {
            warn!(client_id = %auth.user_id(), error = %e, "balance check unavailable, accepting request");
        }
    }

    let repo = WithdrawalRepository::new(state.db.as_ref().clone());
    match repo.create(auth.user_id(), body.amount).await {
        Ok(withdrawal) => {
            (StatusCode::CREATED, Json(WithdrawalResponse::from(withdrawal))).into_response()
        }
        Err(e) => withdrawal_error_response(&e),
    }
}

/// Lists the authenticated client's withdrawals.
async fn list_client_withdrawals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    let repo = WithdrawalRepository::new(state.db.as_ref().clone());
    match repo.list_for_client(auth.user_id()).await {
        Ok(rows) => {
            let out: Vec<WithdrawalResponse> = rows.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => withdrawal_error_response(&e),
    }
}

/// Lists all withdrawals.
async fn list_withdrawals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = WithdrawalRepository::new(state.db.as_ref().clone());
    match repo.list().await {
        Ok(rows) => {
            let out: Vec<WithdrawalResponse> = rows.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => withdrawal_error_response(&e),
    }
}

/// Approves a pending withdrawal.
async fn approve_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    decide_withdrawal(state, auth, id, WithdrawalDecision::Approve).await
}

/// Rejects a pending withdrawal.
async fn reject_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    decide_withdrawal(state, auth, id, WithdrawalDecision::Reject).await
}

/// Deletes a withdrawal at any status.
async fn delete_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = WithdrawalRepository::new(state.db.as_ref().clone());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => withdrawal_error_response(&e),
    }
}

async fn decide_withdrawal(
    state: AppState,
    auth: AuthUser,
    id: Uuid,
    decision: WithdrawalDecision,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = WithdrawalRepository::new(state.db.as_ref().clone());
    match repo.decide(id, decision).await {
        Ok(withdrawal) => {
            notify_decision(&state, &withdrawal, decision);
            Json(WithdrawalResponse::from(withdrawal)).into_response()
        }
        Err(e) => withdrawal_error_response(&e),
    }
}

/// Writes a best-effort notification after a decision commits.
fn notify_decision(state: &AppState, withdrawal: &withdrawals::Model, decision: WithdrawalDecision) {
    let repo = NotificationRepository::new(state.db.as_ref().clone());
    let user_id = withdrawal.client_id;
    let verb = match decision {
        WithdrawalDecision::Approve => "approved",
        WithdrawalDecision::Reject => "rejected",
    };
    let message = format!("Your withdrawal of {} was {verb}", withdrawal.amount);

    tokio::spawn(async move {
        if let Err(e) = repo
            .create(user_id, NotificationKind::Withdrawal, message)
            .await
        {
            warn!(user_id = %user_id, error = %e, "withdrawal notification write failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use soundledger_core::royalty::{
        ResolvedShare, ShareResolution, SnapshotInputs, compute_snapshot,
    };

    use super::*;

    // Share 20%, gross 10,000, withdrawn 1,000, pending 500 → balance 500.
    fn snapshot_with_balance_500() -> FinancialSnapshot {
        compute_snapshot(SnapshotInputs {
            total_gross: dec!(10000),
            share: ResolvedShare {
                share_percent: dec!(20),
                label_name: Some("Demo Records".to_string()),
                resolution: ShareResolution::ById,
            },
            total_withdrawn: dec!(1000),
            pending_amount: dec!(500),
        })
    }

    #[test]
    fn request_above_balance_is_refused() {
        let snapshot = snapshot_with_balance_500();
        assert_eq!(snapshot.balance, dec!(500));
        assert!(exceeds_balance(dec!(600), &snapshot));
    }

    #[test]
    fn request_at_or_below_balance_passes() {
        let snapshot = snapshot_with_balance_500();
        assert!(!exceeds_balance(dec!(500), &snapshot));
        assert!(!exceeds_balance(dec!(100), &snapshot));
    }

    #[test]
    fn any_request_against_negative_balance_is_refused() {
        let mut snapshot = snapshot_with_balance_500();
        snapshot.balance = dec!(-25);
        assert!(exceeds_balance(dec!(0.01), &snapshot));
    }
}
