//! Domain error type shared by the persistence and API layers.
//!
//! Variants correspond to the outcomes a caller can act on; the API layer
//! maps each one to an HTTP status. Messages are written for the portal
//! user, so validation errors name the offending field or value.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A lookup by primary key came up empty.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input broke a domain rule (empty required field, bad CPF/CNPJ
    /// check digits, malformed CEP or email, unknown tag).
    #[error("{0}")]
    Validation(String),

    /// The operation would duplicate something that must be unique.
    #[error("{0}")]
    Conflict(String),

    /// Credentials are missing, wrong, or expired.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but the role does not allow this.
    #[error("{0}")]
    Forbidden(String),

    /// A fault the caller cannot do anything about.
    #[error("{0}")]
    Internal(String),
}
