//! Label repository for revenue-share resolution and label management.
//!
//! Share resolution is two-phase: an exact match on the owning user ID,
//! then a case-insensitive match on the label's contact email. Clients
//! with no matching label resolve to a zero share rather than an error.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{Expr, Func},
};
use soundledger_core::royalty::{ResolvedShare, ShareResolution};
use uuid::Uuid;

use crate::entities::{labels, users};

/// Error types for label operations.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// Label not found.
    #[error("Label not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a label.
#[derive(Debug, Clone)]
pub struct CreateLabelInput {
    /// Owning client account.
    pub owner_id: Uuid,
    /// Optional contact email used as a fallback lookup key.
    pub contact_email: Option<String>,
    /// Label name.
    pub name: String,
    /// Revenue-share percentage in [0, 100].
    pub revenue_share: rust_decimal::Decimal,
}

/// Label repository for share lookup and CRUD.
#[derive(Debug, Clone)]
pub struct LabelRepository {
    db: DatabaseConnection,
}

impl LabelRepository {
    /// Creates a new label repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the revenue share for a client account.
    ///
    /// Tries an exact owner-ID match first, then falls back to a
    /// case-insensitive match between the client's email and the label's
    /// contact email. Returns an unresolved zero share when neither
    /// matches, so read paths keep working for unprovisioned clients.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn resolve_for_client(&self, client_id: Uuid) -> Result<ResolvedShare, LabelError> {
        if let Some(label) = labels::Entity::find()
            .filter(labels::Column::OwnerId.eq(client_id))
            .one(&self.db)
            .await?
        {
            return Ok(ResolvedShare {
                share_percent: label.revenue_share,
                label_name: Some(label.name),
                resolution: ShareResolution::ById,
            });
        }

        let Some(user) = users::Entity::find_by_id(client_id).one(&self.db).await? else {
            return Ok(ResolvedShare::unresolved());
        };

        let by_email = labels::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(labels::Column::ContactEmail)))
                    .eq(user.email.to_lowercase()),
            )
            .one(&self.db)
            .await?;

        Ok(by_email.map_or_else(ResolvedShare::unresolved, |label| ResolvedShare {
            share_percent: label.revenue_share,
            label_name: Some(label.name),
            resolution: ShareResolution::ByEmail,
        }))
    }

    /// Creates a label.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(&self, input: CreateLabelInput) -> Result<labels::Model, LabelError> {
        let label = labels::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(input.owner_id),
            contact_email: Set(input.contact_email),
            name: Set(input.name),
            revenue_share: Set(input.revenue_share),
            created_at: Set(Utc::now().into()),
        };

        let created = label.insert(&self.db).await?;
        Ok(created)
    }

    /// Lists all labels, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<labels::Model>, LabelError> {
        let all = labels::Entity::find()
            .order_by_desc(labels::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(all)
    }
}
