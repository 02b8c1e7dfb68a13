//! Notification repository.
//!
//! Notifications are best-effort: callers write them after the main
//! operation commits and log failures instead of surfacing them.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::notifications;

/// Number of notifications returned by the recent feed.
const RECENT_LIMIT: u64 = 10;

/// Kind of event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A revenue report was ingested.
    Revenue,
    /// A withdrawal request changed state.
    Withdrawal,
}

impl NotificationKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a notification for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        message: String,
    ) -> Result<notifications::Model, DbErr> {
        let notification = notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            message: Set(message),
            kind: Set(kind.as_str().to_string()),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        };

        notification.insert(&self.db).await
    }

    /// Lists a user's most recent notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_recent(&self, user_id: Uuid) -> Result<Vec<notifications::Model>, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await
    }

    /// Marks all of a user's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
