//! Handlers for the equipment model catalog that feeds the form dropdowns.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use balcao_core::error::CoreError;
use balcao_core::types::DbId;
use balcao_db::models::equipment_model::{CreateEquipmentModel, EquipmentModel};
use balcao_db::repositories::EquipmentModelRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/models
///
/// Active catalog entries in alphabetical order.
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EquipmentModel>>>> {
    let models = EquipmentModelRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse::new(models)))
}

/// POST /api/v1/admin/models
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateEquipmentModel>,
) -> AppResult<(StatusCode, Json<DataResponse<EquipmentModel>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Model name must not be empty".into(),
        )));
    }

    let model = EquipmentModelRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(model))))
}

/// DELETE /api/v1/admin/models/{id}
///
/// Soft delete so historical entries keep referencing the model name.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let updated = EquipmentModelRepo::deactivate(&state.pool, id).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "equipment_model",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
