//! Repository for the `attachments` table.

use balcao_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::{Attachment, AttachmentMeta, NewAttachment};

const COLUMNS: &str = "id, entry_id, file_name, size_bytes, mime_type, data_base64, created_at";
const META_COLUMNS: &str = "id, entry_id, file_name, size_bytes, mime_type, created_at";

/// Provides CRUD operations for form-entry attachments.
pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Insert an attachment, returning the generated ID.
    ///
    /// Takes any executor so the caller can insert attachments in the
    /// same transaction as their entry.
    pub async fn create<'e>(
        executor: impl sqlx::PgExecutor<'e>,
        input: &NewAttachment,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO attachments (entry_id, file_name, size_bytes, mime_type, data_base64)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.entry_id)
        .bind(&input.file_name)
        .bind(input.size_bytes)
        .bind(&input.mime_type)
        .bind(&input.data_base64)
        .fetch_one(executor)
        .await
    }

    /// List attachment metadata for an entry (payload excluded).
    pub async fn list_meta_for_entry(
        pool: &PgPool,
        entry_id: DbId,
    ) -> Result<Vec<AttachmentMeta>, sqlx::Error> {
        let query =
            format!("SELECT {META_COLUMNS} FROM attachments WHERE entry_id = $1 ORDER BY id");
        sqlx::query_as::<_, AttachmentMeta>(&query)
            .bind(entry_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch a full attachment, scoped to its entry.
    pub async fn find_for_entry(
        pool: &PgPool,
        entry_id: DbId,
        id: DbId,
    ) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE id = $1 AND entry_id = $2");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .bind(entry_id)
            .fetch_optional(pool)
            .await
    }
}
