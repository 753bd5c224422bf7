//! Admin handlers for user management.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use balcao_core::error::CoreError;
use balcao_core::forms::plausible_email;
use balcao_core::types::DbId;
use balcao_db::models::user::{CreateUser, UpdateUser, UserResponse};
use balcao_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Role name (`admin`, `tecnico`, `comercial`).
    pub role: String,
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Role name; resolved to `role_id` before the update.
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;

    // Resolve role ids to names in one pass.
    let roles: HashMap<DbId, String> = RoleRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let responses = users
        .into_iter()
        .map(|user| {
            let role = roles.get(&user.role_id).cloned().unwrap_or_default();
            UserResponse::from_user(user, role)
        })
        .collect();

    Ok(Json(DataResponse::new(responses)))
}

/// POST /api/v1/admin/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    // 1. Validate inputs.
    if input.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username must not be empty".into(),
        )));
    }
    if !plausible_email(&input.email) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Malformed email address: {}",
            input.email
        ))));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. Resolve the role name.
    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role: {}",
                input.role
            )))
        })?;

    // 3. Hash the password and insert. A duplicate username or email maps
    //    to 409 via the unique constraints.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %role.name,
        admin_id = admin.user_id,
        "user created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from_user(user, role.name))),
    ))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(email) = &input.email {
        if !plausible_email(email) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Malformed email address: {email}"
            ))));
        }
    }

    let role_id = match &input.role {
        Some(name) => {
            let role = RoleRepo::find_by_name(&state.pool, name)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!("Unknown role: {name}")))
                })?;
            Some(role.id)
        }
        None => None,
    };

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        role_id,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    // A deactivated user must not keep a live refresh token.
    if update.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse::new(UserResponse::from_user(
        user, role_name,
    ))))
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Sets a new password and revokes the user's sessions. Returns 204.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let updated = UserRepo::update_password(&state.pool, id, &password_hash).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "user", id }));
    }

    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "password reset");
    Ok(StatusCode::NO_CONTENT)
}
