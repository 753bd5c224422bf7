//! `/auth` endpoints.
//!
//! Login and refresh are the only unauthenticated endpoints in the API;
//! logout needs a live access token so it can find the caller's sessions.
//!
//! ```text
//! POST /login
//! POST /refresh
//! POST /logout
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
