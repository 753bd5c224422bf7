//! Route definitions for the `/cep` lookup resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::cep;
use crate::state::AppState;

/// Routes mounted at `/cep`.
///
/// ```text
/// GET /{cep} -> lookup (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{cep}", get(cep::lookup))
}
