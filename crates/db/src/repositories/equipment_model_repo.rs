//! Repository for the `equipment_models` table.

use balcao_core::types::DbId;
use sqlx::PgPool;

use crate::models::equipment_model::{CreateEquipmentModel, EquipmentModel};

const COLUMNS: &str = "id, name, is_active, created_at";

/// Provides CRUD operations for the equipment model catalog.
pub struct EquipmentModelRepo;

impl EquipmentModelRepo {
    /// List active models in alphabetical order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<EquipmentModel>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM equipment_models WHERE is_active = true ORDER BY name");
        sqlx::query_as::<_, EquipmentModel>(&query)
            .fetch_all(pool)
            .await
    }

    /// Register a new model, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEquipmentModel,
    ) -> Result<EquipmentModel, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment_models (name)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentModel>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Retire a model from the catalog. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE equipment_models SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
