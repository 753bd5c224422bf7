//! Per-form-type email routing configuration.

use balcao_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `email_configs` table. One row exists per form type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailConfig {
    pub id: DbId,
    /// Form type tag this configuration applies to.
    pub form_type: String,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub subject_prefix: String,
    /// Dispatch scheme tag (`mailto` or `outlook`).
    pub scheme: String,
    pub updated_at: Timestamp,
}

/// DTO for replacing a form type's email configuration.
#[derive(Debug, Deserialize)]
pub struct UpsertEmailConfig {
    pub recipients: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub subject_prefix: String,
    pub scheme: String,
}
