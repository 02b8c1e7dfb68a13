//! Account routes: profile, settings, and notifications.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use soundledger_db::{
    LabelRepository, NotificationRepository, UserRepository,
    entities::notifications,
    repositories::user::UserError,
};
use soundledger_shared::Currency;

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/client/settings", post(update_settings))
        .route("/client/notifications", get(list_notifications))
        .route("/client/notifications/read", post(mark_notifications_read))
}

/// Profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Role ("admin" or "client").
    pub role: String,
    /// Display-currency preference.
    pub currency: String,
    /// Revenue-share percentage, when a label resolves.
    pub share_percent: Option<String>,
    /// Resolved label name, if any.
    pub label_name: Option<String>,
}

/// Request body for updating account settings.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// New display-currency preference.
    pub currency: Currency,
}

/// Notification in responses.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: Uuid,
    /// Message text.
    pub message: String,
    /// Notification kind.
    pub kind: String,
    /// Whether the user has read it.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(m: notifications::Model) -> Self {
        Self {
            id: m.id,
            message: m.message,
            kind: m.kind,
            is_read: m.is_read,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

fn user_error_response(e: &UserError) -> axum::response::Response {
    match e {
        UserError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("User not found: {id}")
            })),
        )
            .into_response(),
        UserError::Database(db) => {
            error!(error = %db, "user operation failed");
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

/// Returns the authenticated user's profile with their resolved share.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> axum::response::Response {
    let users = UserRepository::new(state.db.as_ref().clone());
    let user = match users.find_by_id(auth.user_id()).await {
        Ok(user) => user,
        Err(e) => return user_error_response(&e),
    };

    // Share resolution is a read-path extra; degrade quietly if it fails.
    let labels = LabelRepository::new(state.db.as_ref().clone());
    let share = match labels.resolve_for_client(user.id).await {
        Ok(share) => share,
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "share resolution failed for profile");
            soundledger_core::royalty::ResolvedShare::unresolved()
        }
    };

    let share_percent = share
        .label_name
        .is_some()
        .then(|| share.share_percent.to_string());

    Json(ProfileResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: format!("{:?}", user.role).to_lowercase(),
        currency: user.currency,
        share_percent,
        label_name: share.label_name,
    })
    .into_response()
}

/// Updates the authenticated user's display-currency preference.
async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateSettingsRequest>,
) -> axum::response::Response {
    let repo = UserRepository::new(state.db.as_ref().clone());
    match repo.update_currency(auth.user_id(), body.currency).await {
        Ok(user) => Json(json!({ "currency": user.currency })).into_response(),
        Err(e) => user_error_response(&e),
    }
}

/// Lists the authenticated user's recent notifications.
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    let repo = NotificationRepository::new(state.db.as_ref().clone());
    match repo.list_recent(auth.user_id()).await {
        Ok(rows) => {
            let out: Vec<NotificationResponse> = rows.into_iter().map(Into::into).collect();
            Json(out).into_response()
        }
        Err(e) => {
            // Notifications are a read-path extra; an empty feed beats a 500.
            warn!(user_id = %auth.user_id(), error = %e, "notification list failed");
            Json(Vec::<NotificationResponse>::new()).into_response()
        }
    }
}

/// Marks all of the authenticated user's notifications as read.
async fn mark_notifications_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> axum::response::Response {
    let repo = NotificationRepository::new(state.db.as_ref().clone());
    match repo.mark_all_read(auth.user_id()).await {
        Ok(updated) => Json(json!({ "updated": updated })).into_response(),
        Err(e) => {
            error!(user_id = %auth.user_id(), error = %e, "mark notifications read failed");
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
