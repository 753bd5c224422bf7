//! Equipment model catalog entry.

use balcao_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `equipment_models` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentModel {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for registering an equipment model.
#[derive(Debug, Deserialize)]
pub struct CreateEquipmentModel {
    pub name: String,
}
