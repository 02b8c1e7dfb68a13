//! Authentication claim types.
//!
//! Token issuance lives in the login glue outside this backend; these types
//! cover what the API layer needs to validate and read a bearer token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role names carried in token claims.
pub const ROLE_ADMIN: &str = "admin";
/// Client (label account) role.
pub const ROLE_CLIENT: &str = "client";

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User email, used for the label contact-email fallback lookup.
    pub email: String,
    /// User's role ("admin" or "client").
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, email: &str, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the claims carry the administrative role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_check() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let admin = Claims::new(Uuid::new_v4(), "ops@label.test", ROLE_ADMIN, expires);
        let client = Claims::new(Uuid::new_v4(), "artist@label.test", ROLE_CLIENT, expires);

        assert!(admin.is_admin());
        assert!(!client.is_admin());
    }
}
