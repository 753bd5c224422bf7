//! Role gates layered on top of [`AuthUser`].
//!
//! The portal has one privileged tier: `admin` manages users, the
//! equipment catalog, notifications, and email routing. `tecnico` and
//! `comercial` share the regular surface, so a single gate suffices.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use balcao_core::error::CoreError;
use balcao_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Admits only callers whose token carries the `admin` role; everyone
/// else gets 403. Wraps the plain [`AuthUser`] so handlers can still log
/// the acting admin's id.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "This operation requires administrator access".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
