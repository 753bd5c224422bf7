//! Route definitions for the `/forms` resource.
//!
//! All endpoints require authentication; deletion is admin only.

use axum::routing::get;
use axum::Router;

use crate::handlers::{export, forms};
use crate::state::AppState;

/// Routes mounted at `/forms`.
///
/// ```text
/// POST   /                               -> submit
/// GET    /                               -> list (raw-data viewer)
/// GET    /export                         -> export (csv or json)
/// GET    /{id}                           -> get
/// DELETE /{id}                           -> delete (admin only)
/// GET    /{id}/attachments               -> list_attachments
/// GET    /{id}/attachments/{attachment_id} -> download_attachment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list).post(forms::submit))
        .route("/export", get(export::export))
        .route("/{id}", get(forms::get).delete(forms::delete))
        .route("/{id}/attachments", get(forms::list_attachments))
        .route(
            "/{id}/attachments/{attachment_id}",
            get(forms::download_attachment),
        )
}
