//! Attachment entity models and DTOs.

use balcao_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A full row from the `attachments` table, including the payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub entry_id: DbId,
    pub file_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    /// Base64-encoded file content.
    pub data_base64: String,
    pub created_at: Timestamp,
}

/// Attachment metadata without the payload, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttachmentMeta {
    pub id: DbId,
    pub entry_id: DbId,
    pub file_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: Timestamp,
}

/// DTO for inserting an attachment.
#[derive(Debug)]
pub struct NewAttachment {
    pub entry_id: DbId,
    pub file_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub data_base64: String,
}
