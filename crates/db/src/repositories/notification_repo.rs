//! Repository for the `notifications` and `notification_reads` tables.

use balcao_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{
    CreateNotification, Notification, NotificationWithRead, UpdateNotification,
};

const COLUMNS: &str = "id, title, message, kind, is_active, created_at, updated_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (title, message, kind)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.kind)
            .fetch_one(pool)
            .await
    }

    /// Update a notification. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNotification,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET
                title = COALESCE($2, title),
                message = COALESCE($3, message),
                kind = COALESCE($4, kind),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.kind)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a notification. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List active notifications newest-first, annotated with the given
    /// user's read flag.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<NotificationWithRead>, sqlx::Error> {
        sqlx::query_as::<_, NotificationWithRead>(
            "SELECT n.id, n.title, n.message, n.kind, n.is_active, n.created_at,
                    (r.notification_id IS NOT NULL) AS is_read
             FROM notifications n
             LEFT JOIN notification_reads r
               ON r.notification_id = n.id AND r.user_id = $1
             WHERE n.is_active = true
             ORDER BY n.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Whether an active notification with this id exists.
    pub async fn exists_active(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM notifications WHERE id = $1 AND is_active = true)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Mark one notification read for a user. Idempotent.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notification_reads (user_id, notification_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, notification_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(notification_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark every active notification read for a user. Returns the number
    /// newly marked.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO notification_reads (user_id, notification_id)
             SELECT $1, n.id FROM notifications n
             WHERE n.is_active = true
             ON CONFLICT (user_id, notification_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The badge count: active notifications the user has not read.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications n
             WHERE n.is_active = true
               AND NOT EXISTS (
                   SELECT 1 FROM notification_reads r
                   WHERE r.notification_id = n.id AND r.user_id = $1
               )",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
