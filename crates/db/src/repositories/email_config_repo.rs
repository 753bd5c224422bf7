//! Repository for the `email_configs` table.

use sqlx::PgPool;

use crate::models::email_config::{EmailConfig, UpsertEmailConfig};

const COLUMNS: &str = "id, form_type, recipients, cc, subject_prefix, scheme, updated_at";

/// Provides access to the per-form-type email routing configuration.
pub struct EmailConfigRepo;

impl EmailConfigRepo {
    /// List all configurations, one per form type.
    pub async fn list(pool: &PgPool) -> Result<Vec<EmailConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_configs ORDER BY form_type");
        sqlx::query_as::<_, EmailConfig>(&query)
            .fetch_all(pool)
            .await
    }

    /// Fetch the configuration for one form type.
    pub async fn find_by_form_type(
        pool: &PgPool,
        form_type: &str,
    ) -> Result<Option<EmailConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_configs WHERE form_type = $1");
        sqlx::query_as::<_, EmailConfig>(&query)
            .bind(form_type)
            .fetch_optional(pool)
            .await
    }

    /// Replace the configuration for one form type, returning the new row.
    pub async fn upsert(
        pool: &PgPool,
        form_type: &str,
        input: &UpsertEmailConfig,
    ) -> Result<EmailConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_configs (form_type, recipients, cc, subject_prefix, scheme)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (form_type) DO UPDATE SET
                recipients = EXCLUDED.recipients,
                cc = EXCLUDED.cc,
                subject_prefix = EXCLUDED.subject_prefix,
                scheme = EXCLUDED.scheme,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailConfig>(&query)
            .bind(form_type)
            .bind(&input.recipients)
            .bind(&input.cc)
            .bind(&input.subject_prefix)
            .bind(&input.scheme)
            .fetch_one(pool)
            .await
    }
}
