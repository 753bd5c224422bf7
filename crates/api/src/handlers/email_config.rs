//! Admin handlers for the per-form-type email routing configuration.

use axum::extract::{Path, State};
use axum::Json;
use balcao_core::error::CoreError;
use balcao_core::forms::{plausible_email, FormType};
use balcao_core::mail::{DispatchScheme, MAX_ADDRESS_LIST_LEN};
use balcao_db::models::email_config::{EmailConfig, UpsertEmailConfig};
use balcao_db::repositories::EmailConfigRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/email-configs
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<EmailConfig>>>> {
    let configs = EmailConfigRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(configs)))
}

/// PUT /api/v1/admin/email-configs/{form_type}
///
/// Replace the routing for one form type. Recipients may be empty, which
/// disables mail composition for that type.
pub async fn upsert(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(form_type): Path<String>,
    Json(input): Json<UpsertEmailConfig>,
) -> AppResult<Json<DataResponse<EmailConfig>>> {
    let form_type = FormType::parse(&form_type)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown form type: {form_type}")))?;

    if DispatchScheme::parse(&input.scheme).is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown dispatch scheme: {} (expected mailto or outlook)",
            input.scheme
        ))));
    }

    let mut address_chars = 0;
    for addr in input.recipients.iter().chain(input.cc.iter()) {
        if !plausible_email(addr) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Malformed email address: {addr}"
            ))));
        }
        address_chars += addr.len() + 1;
    }
    // The address list is never truncated when the dispatch URI is built,
    // so bound it here instead.
    if address_chars > MAX_ADDRESS_LIST_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Recipient lists are limited to {MAX_ADDRESS_LIST_LEN} characters in total"
        ))));
    }

    let config = EmailConfigRepo::upsert(&state.pool, form_type.as_str(), &input).await?;

    tracing::info!(
        form_type = %form_type,
        recipients = config.recipients.len(),
        admin_id = admin.user_id,
        "email routing updated"
    );
    Ok(Json(DataResponse::new(config)))
}
