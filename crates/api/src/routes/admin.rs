//! Route definitions for the `/admin` resource tree.
//!
//! Every handler here re-checks the admin role via the `RequireAdmin`
//! extractor, so mounting order cannot accidentally expose an endpoint.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{email_config, models, notification, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                      -> list users
/// POST   /users                      -> create user
/// PUT    /users/{id}                 -> update user
/// POST   /users/{id}/reset-password  -> reset password
///
/// POST   /notifications              -> publish notification
/// PUT    /notifications/{id}         -> update notification
/// DELETE /notifications/{id}         -> deactivate notification
///
/// GET    /email-configs              -> list email routing
/// PUT    /email-configs/{form_type}  -> replace email routing
///
/// POST   /models                     -> register equipment model
/// DELETE /models/{id}                -> retire equipment model
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // User management
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", put(users::update))
        .route("/users/{id}/reset-password", post(users::reset_password))
        // Notification publishing
        .route("/notifications", post(notification::create))
        .route(
            "/notifications/{id}",
            put(notification::update).delete(notification::deactivate),
        )
        // Email routing configuration
        .route("/email-configs", get(email_config::list))
        .route("/email-configs/{form_type}", put(email_config::upsert))
        // Equipment model catalog
        .route("/models", post(models::create))
        .route("/models/{id}", delete(models::deactivate))
}
