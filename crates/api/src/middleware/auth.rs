//! Bearer-token extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use balcao_core::error::CoreError;
use balcao_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller's identity, taken from the access token.
///
/// Adding this parameter to a handler makes the endpoint require
/// authentication; the portal has no anonymous endpoints apart from login,
/// refresh, and the health check.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role name from the token. Per-request role checks go through
    /// [`RequireAdmin`](super::rbac::RequireAdmin) rather than reading
    /// this directly.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("Missing bearer token"))?;

        let claims = state
            .config
            .jwt
            .decode_access_token(token)
            .map_err(|_| unauthorized("Access token is invalid or expired"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}
