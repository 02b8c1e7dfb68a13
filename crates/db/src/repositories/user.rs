//! User repository for account lookup and preference updates.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use soundledger_shared::types::Currency;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User repository for account queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no user exists with the given ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Finds a user by email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// Lists all client accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_clients(&self) -> Result<Vec<users::Model>, UserError> {
        let clients = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Client))
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(clients)
    }

    /// Updates a user's display-currency preference.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no user exists with the given ID.
    pub async fn update_currency(
        &self,
        id: Uuid,
        currency: Currency,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?;

        let mut active: users::ActiveModel = user.into();
        active.currency = Set(currency.to_string());
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
