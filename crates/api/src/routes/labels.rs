//! Label and client administration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use soundledger_db::{
    LabelRepository, UserRepository,
    entities::{labels, users},
    repositories::label::CreateLabelInput,
};

/// Creates the label routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/labels", get(list_labels))
        .route("/admin/labels", post(create_label))
        .route("/admin/clients", get(list_clients))
}

/// Request body for creating a label.
#[derive(Debug, Deserialize)]
pub struct CreateLabelRequest {
    /// Owning client account.
    pub owner_id: Uuid,
    /// Optional contact email used as a fallback lookup key.
    pub contact_email: Option<String>,
    /// Label name.
    pub name: String,
    /// Revenue-share percentage in [0, 100].
    pub revenue_share: Decimal,
}

/// Label in responses.
#[derive(Debug, Serialize)]
pub struct LabelResponse {
    /// Label ID.
    pub id: Uuid,
    /// Owning client account.
    pub owner_id: Uuid,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Label name.
    pub name: String,
    /// Revenue-share percentage.
    pub revenue_share: String,
}

impl From<labels::Model> for LabelResponse {
    fn from(m: labels::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            contact_email: m.contact_email,
            name: m.name,
            revenue_share: m.revenue_share.to_string(),
        }
    }
}

/// Client account in responses.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Display-currency preference.
    pub currency: String,
}

impl From<users::Model> for ClientResponse {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            display_name: m.display_name,
            currency: m.currency,
        }
    }
}

fn internal_error(e: &dyn std::fmt::Display, context: &str) -> axum::response::Response {
    error!(error = %e, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// Lists all labels.
async fn list_labels(State(state): State<AppState>, auth: AuthUser) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = LabelRepository::new(state.db.as_ref().clone());
    match repo.list().await {
        Ok(all) => {
            let out: Vec<LabelResponse> = all.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => internal_error(&e, "label list failed"),
    }
}

/// Creates a label.
async fn create_label(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateLabelRequest>,
) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    if body.revenue_share < Decimal::ZERO || body.revenue_share > Decimal::ONE_HUNDRED {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "revenue_share must be between 0 and 100"
            })),
        )
            .into_response();
    }

    let repo = LabelRepository::new(state.db.as_ref().clone());
    let input = CreateLabelInput {
        owner_id: body.owner_id,
        contact_email: body.contact_email,
        name: body.name,
        revenue_share: body.revenue_share,
    };

    match repo.create(input).await {
        Ok(label) => (StatusCode::CREATED, Json(LabelResponse::from(label))).into_response(),
        Err(e) => internal_error(&e, "label create failed"),
    }
}

/// Lists all client accounts.
async fn list_clients(State(state): State<AppState>, auth: AuthUser) -> axum::response::Response {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = UserRepository::new(state.db.as_ref().clone());
    match repo.list_clients().await {
        Ok(clients) => {
            let out: Vec<ClientResponse> = clients.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => internal_error(&e, "client list failed"),
    }
}
