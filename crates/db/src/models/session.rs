//! Session entity model (refresh-token rotation).

use balcao_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
///
/// Stores only the SHA-256 hash of the refresh token; the plaintext is
/// held by the client alone.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
