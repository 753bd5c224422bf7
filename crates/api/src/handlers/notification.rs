//! Handlers for the `/notifications` resource plus the admin-side
//! publishing endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use balcao_core::error::CoreError;
use balcao_core::types::DbId;
use balcao_db::models::notification::{
    CreateNotification, Notification, NotificationWithRead, UpdateNotification,
};
use balcao_db::repositories::NotificationRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `GET /notifications/unread-count`.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// Response body for `POST /notifications/read-all`.
#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    /// Notifications newly marked read by this call.
    pub marked: u64,
}

// ---------------------------------------------------------------------------
// User-facing handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// Active notifications newest-first, each carrying this user's read flag.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<NotificationWithRead>>>> {
    let notifications =
        NotificationRepo::list_active_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCountResponse>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse::new(UnreadCountResponse { count })))
}

/// POST /api/v1/notifications/{id}/read
///
/// Idempotent for known notifications; unknown or inactive ids are 404.
pub async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::exists_active(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }));
    }
    NotificationRepo::mark_read(&state.pool, id, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<MarkAllResponse>>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse::new(MarkAllResponse { marked })))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/notifications
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateNotification>,
) -> AppResult<(StatusCode, Json<DataResponse<Notification>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Notification title must not be empty".into(),
        )));
    }

    let notification = NotificationRepo::create(&state.pool, &input).await?;

    tracing::info!(
        notification_id = notification.id,
        admin_id = admin.user_id,
        "notification published"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(notification))))
}

/// PUT /api/v1/admin/notifications/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNotification>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }))?;
    Ok(Json(DataResponse::new(notification)))
}

/// DELETE /api/v1/admin/notifications/{id}
///
/// Soft delete: flips `is_active` off so existing read records survive.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let updated = NotificationRepo::deactivate(&state.pool, id).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
