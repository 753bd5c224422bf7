pub mod admin;
pub mod auth;
pub mod cep;
pub mod forms;
pub mod health;
pub mod models;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
///
/// /forms                                   submit (POST), raw-data list (GET)
/// /forms/export                            CSV/JSON export (GET)
/// /forms/{id}                              get, delete (admin)
/// /forms/{id}/attachments                  list metadata
/// /forms/{id}/attachments/{attachment_id}  download
///
/// /cep/{cep}                               address lookup for autofill
///
/// /models                                  equipment model catalog (GET)
///
/// /notifications                           list with read flags
/// /notifications/unread-count              badge count
/// /notifications/read-all                  mark all read (POST)
/// /notifications/{id}/read                 mark one read (POST)
///
/// /admin/users                             list, create (admin only)
/// /admin/users/{id}                        update
/// /admin/users/{id}/reset-password         reset password (POST)
/// /admin/notifications                     publish (POST)
/// /admin/notifications/{id}                update (PUT), deactivate (DELETE)
/// /admin/email-configs                     list (GET)
/// /admin/email-configs/{form_type}         replace (PUT)
/// /admin/models                            register (POST)
/// /admin/models/{id}                       retire (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/forms", forms::router())
        .nest("/cep", cep::router())
        .nest("/models", models::router())
        .nest("/notifications", notification::router())
        .nest("/admin", admin::router())
}
