//! Route definitions for the equipment model catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

/// Routes mounted at `/models`.
///
/// ```text
/// GET / -> list (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(models::list))
}
