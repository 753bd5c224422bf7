//! Repository for the `form_entries` table.

use balcao_core::types::DbId;
use sqlx::PgPool;

use crate::models::form_entry::{EntryFilter, FormEntry, NewFormEntry};

/// Column list for `form_entries` queries.
const COLUMNS: &str = "id, form_type, created_by, razao_social, documento, contato, email, \
                       telefone, cep, logradouro, numero, complemento, bairro, cidade, uf, \
                       details, created_at";

/// Provides CRUD operations for form entries.
pub struct FormEntryRepo;

impl FormEntryRepo {
    /// Insert a new entry, returning the created row.
    ///
    /// Takes any executor so the caller can run it inside a transaction
    /// together with the entry's attachments.
    pub async fn create<'e>(
        executor: impl sqlx::PgExecutor<'e>,
        input: &NewFormEntry,
    ) -> Result<FormEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_entries
                (form_type, created_by, razao_social, documento, contato, email, telefone,
                 cep, logradouro, numero, complemento, bairro, cidade, uf, details)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormEntry>(&query)
            .bind(&input.form_type)
            .bind(input.created_by)
            .bind(&input.razao_social)
            .bind(&input.documento)
            .bind(&input.contato)
            .bind(&input.email)
            .bind(&input.telefone)
            .bind(&input.cep)
            .bind(&input.logradouro)
            .bind(&input.numero)
            .bind(&input.complemento)
            .bind(&input.bairro)
            .bind(&input.cidade)
            .bind(&input.uf)
            .bind(&input.details)
            .fetch_one(executor)
            .await
    }

    /// Find an entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FormEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_entries WHERE id = $1");
        sqlx::query_as::<_, FormEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries newest-first with optional form-type filter and
    /// substring search over client name and document. The search term is
    /// matched literally; `%` and `_` in it do not act as wildcards.
    pub async fn list(pool: &PgPool, filter: &EntryFilter) -> Result<Vec<FormEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_entries
             WHERE ($1::text IS NULL OR form_type = $1)
               AND ($2::text IS NULL
                    OR razao_social ILIKE '%' || $2 || '%'
                    OR documento LIKE '%' || $2 || '%')
             ORDER BY id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, FormEntry>(&query)
            .bind(&filter.form_type)
            .bind(filter.search.as_deref().map(escape_like))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// List every entry in insertion order, optionally restricted to one
    /// form type. Used by the export endpoint.
    pub async fn list_all(
        pool: &PgPool,
        form_type: Option<&str>,
    ) -> Result<Vec<FormEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_entries
             WHERE ($1::text IS NULL OR form_type = $1)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, FormEntry>(&query)
            .bind(form_type)
            .fetch_all(pool)
            .await
    }

    /// Delete an entry (attachments cascade). Returns `true` when a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        tracing::debug!(entry_id = id, removed = result.rows_affected() > 0, "entry delete");
        Ok(result.rows_affected() > 0)
    }
}

/// Escape LIKE metacharacters so a search term matches literally.
/// PostgreSQL's default escape character is the backslash.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c\\d"), "c\\\\d");
        assert_eq!(escape_like("Santa Clara"), "Santa Clara");
    }
}
