//! Login, token refresh, and logout.
//!
//! Login failures are deliberately uniform: a wrong password and an
//! unknown username both answer 401 with the same message, so the portal
//! cannot be used to enumerate accounts. Repeated failures put the
//! account on hold for a fixed window.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use balcao_core::error::CoreError;
use balcao_core::types::{DbId, Timestamp};
use balcao_db::models::session::CreateSession;
use balcao_db::models::user::User;
use balcao_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{hash_refresh_token, mint_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Failed logins tolerated before the account goes on hold.
const LOGIN_ATTEMPT_LIMIT: i32 = 5;

/// Minutes an account stays on hold after too many failures.
const LOGIN_HOLD_MINS: i64 = 15;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens handed out by login and refresh.
#[derive(Debug, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    /// When the access token stops working.
    pub access_expires_at: Timestamp,
    /// Opaque, single-use: spending it on `/auth/refresh` rotates it.
    pub refresh_token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub username: String,
    pub role: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<SessionTokens>>> {
    let Some(user) = UserRepo::find_by_username(&state.pool, &input.username).await? else {
        return Err(bad_credentials());
    };
    ensure_account_usable(&user)?;

    let password_ok = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !password_ok {
        register_failed_attempt(&state, &user).await?;
        return Err(bad_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    tracing::info!(user_id = user.id, role = %role, "login");

    let tokens = open_session(&state, &user, role).await?;
    Ok(Json(DataResponse::new(tokens)))
}

/// POST /api/v1/auth/refresh
///
/// Spends the presented refresh token and issues a fresh pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<SessionTokens>>> {
    let digest = hash_refresh_token(&input.refresh_token);
    let Some(session) = SessionRepo::find_by_refresh_token_hash(&state.pool, &digest).await? else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Refresh token is invalid or expired".into(),
        )));
    };

    // The presented token is spent whether or not the rest succeeds.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let Some(user) = UserRepo::find_by_id(&state.pool, session.user_id).await? else {
        return Err(bad_credentials());
    };
    ensure_account_usable(&user)?;

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let tokens = open_session(&state, &user, role).await?;
    Ok(Json(DataResponse::new(tokens)))
}

/// POST /api/v1/auth/logout
///
/// Kills every session of the caller, not just the current one: the
/// portal runs on shared bench machines, so "sair" must mean everywhere.
pub async fn logout(State(state): State<AppState>, caller: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, caller.user_id).await?;
    tracing::info!(user_id = caller.user_id, sessions = revoked, "logout");
    Ok(StatusCode::NO_CONTENT)
}

fn bad_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Incorrect username or password".into(),
    ))
}

/// Reject deactivated accounts and accounts still on hold. Both answer
/// 403 without hinting whether the password would have been right.
fn ensure_account_usable(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account has been deactivated".into(),
        )));
    }
    if let Some(until) = user.locked_until {
        if until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Too many failed attempts; the account is on hold".into(),
            )));
        }
    }
    Ok(())
}

/// Count the failure and place the account on hold once the limit is hit.
async fn register_failed_attempt(state: &AppState, user: &User) -> AppResult<()> {
    UserRepo::increment_failed_login(&state.pool, user.id).await?;

    if user.failed_login_count + 1 >= LOGIN_ATTEMPT_LIMIT {
        let until = Utc::now() + chrono::Duration::minutes(LOGIN_HOLD_MINS);
        UserRepo::lock_account(&state.pool, user.id, until).await?;
        tracing::warn!(user_id = user.id, "account on hold after repeated login failures");
    }
    Ok(())
}

/// Issue an access/refresh pair and record the session.
async fn open_session(state: &AppState, user: &User, role: String) -> AppResult<SessionTokens> {
    let (access_token, exp) = state
        .config
        .jwt
        .issue_access_token(user.id, &role)
        .map_err(|e| AppError::InternalError(format!("Token signing failed: {e}")))?;
    let access_expires_at = Utc
        .timestamp_opt(exp, 0)
        .single()
        .ok_or_else(|| AppError::InternalError("Token expiry out of range".into()))?;

    let refresh = mint_refresh_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.digest,
            expires_at: Utc::now()
                + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok(SessionTokens {
        access_token,
        access_expires_at,
        refresh_token: refresh.plaintext,
        user: SessionUser {
            id: user.id,
            username: user.username.clone(),
            role,
        },
    })
}
