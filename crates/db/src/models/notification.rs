//! Notification entity models and DTOs.
//!
//! Notifications are portal-wide announcements published by admins. Read
//! state is tracked per user in `notification_reads`; the dashboard badge
//! is the count of active notifications the user has not read.

use balcao_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub title: String,
    pub message: String,
    /// Presentation hint (`info`, `warning`, `maintenance`).
    pub kind: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A notification joined with the requesting user's read flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationWithRead {
    pub id: DbId,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub is_read: bool,
}

/// DTO for creating a notification.
#[derive(Debug, Deserialize)]
pub struct CreateNotification {
    pub title: String,
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "info".to_string()
}

/// DTO for updating a notification. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateNotification {
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub is_active: Option<bool>,
}
