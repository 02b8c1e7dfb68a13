//! Royalty ledger routes.
//!
//! Admins append and remove individual ledger rows; clients list their own.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use soundledger_db::{
    RoyaltyRepository,
    entities::royalty_entries,
    repositories::royalty::{CreateRoyaltyInput, RoyaltyError},
};

/// Creates the royalty routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/royalties", post(create_royalty))
        .route("/admin/royalties/bulk", post(create_royalties_bulk))
        .route("/admin/royalties/{id}", delete(delete_royalty))
        .route("/client/royalties", get(list_client_royalties))
}

/// Request body for appending a ledger entry.
#[derive(Debug, Deserialize)]
pub struct CreateRoyaltyRequest {
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

impl From<CreateRoyaltyRequest> for CreateRoyaltyInput {
    fn from(r: CreateRoyaltyRequest) -> Self {
        Self {
            client_id: r.client_id,
            amount: r.amount,
            entry_date: r.entry_date,
            source: r.source,
            description: r.description,
        }
    }
}

/// Request body for bulk-appending ledger entries.
#[derive(Debug, Deserialize)]
pub struct BulkRoyaltyRequest {
    /// Entries to append.
    pub entries: Vec<CreateRoyaltyRequest>,
}

/// Ledger entry in responses.
#[derive(Debug, Serialize)]
pub struct RoyaltyResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Client account.
    pub client_id: Uuid,
    /// Entry amount.
    pub amount: String,
    /// Date the revenue was earned.
    pub entry_date: String,
    /// Revenue source.
    pub source: String,
    /// Description.
    pub description: String,
}

impl From<royalty_entries::Model> for RoyaltyResponse {
    fn from(m: royalty_entries::Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            amount: m.amount.to_string(),
            entry_date: m.entry_date.to_string(),
            source: m.source,
            description: m.description,
        }
    }
}

fn royalty_error_response(e: &RoyaltyError) -> axum::response::Response {
    match e {
        RoyaltyError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Royalty entry not found: {id}")
            })),
        )
            .into_response(),
        RoyaltyError::Database(db) => {
            error!(error = %db, "royalty operation failed");
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

/// Appends a single ledger entry.
async fn create_royalty(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRoyaltyRequest>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = RoyaltyRepository::new(state.db.as_ref().clone());
    match repo.create(body.into()).await {
        Ok(entry) => (StatusCode::CREATED, Json(RoyaltyResponse::from(entry))).into_response(),
        Err(e) => royalty_error_response(&e),
    }
}

/// Appends ledger entries in bulk.
async fn create_royalties_bulk(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<BulkRoyaltyRequest>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let inputs: Vec<CreateRoyaltyInput> = body.entries.into_iter().map(Into::into).collect();

    let repo = RoyaltyRepository::new(state.db.as_ref().clone());
    match repo.create_bulk(&inputs).await {
        Ok(inserted) => (StatusCode::CREATED, Json(json!({ "inserted": inserted }))).into_response(),
        Err(e) => royalty_error_response(&e),
    }
}

/// Deletes a single ledger entry.
async fn delete_royalty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = RoyaltyRepository::new(state.db.as_ref().clone());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => royalty_error_response(&e),
    }
}

/// Lists the authenticated client's ledger entries.
async fn list_client_royalties(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    let repo = RoyaltyRepository::new(state.db.as_ref().clone());
    match repo.list_for_client(auth.user_id()).await {
        Ok(entries) => {
            let out: Vec<RoyaltyResponse> = entries.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => royalty_error_response(&e),
    }
}
