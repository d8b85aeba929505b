//! Login session model and DTOs.

use sqlx::FromRow;
use stocker_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table.
///
/// `id` is the SHA-256 digest of the cookie value, never the value itself.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl Session {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub token_hash: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
