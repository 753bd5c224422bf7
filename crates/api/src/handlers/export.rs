//! Export of stored form entries as CSV or JSON.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use balcao_core::forms::FormType;
use balcao_db::models::form_entry::FormEntry;
use balcao_db::repositories::FormEntryRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /forms/export`.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// `csv` (default) or `json`.
    #[serde(default = "default_format")]
    pub format: String,
    pub form_type: Option<String>,
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /api/v1/forms/export
///
/// Dump every stored entry in insertion order, optionally restricted to
/// one form type. CSV carries the flat columns plus the details JSON;
/// JSON returns the full rows.
pub async fn export(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let form_type = match query.form_type {
        Some(tag) => {
            let parsed = FormType::parse(&tag)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown form type: {tag}")))?;
            Some(parsed.as_str().to_string())
        }
        None => None,
    };

    let entries = FormEntryRepo::list_all(&state.pool, form_type.as_deref()).await?;

    match query.format.as_str() {
        "json" => Ok(Json(DataResponse::new(entries)).into_response()),
        "csv" => {
            let body = entries_to_csv(&entries)
                .map_err(|e| AppError::InternalError(format!("CSV serialization error: {e}")))?;

            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            );
            headers.insert(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=\"solicitacoes.csv\""),
            );
            Ok((headers, body).into_response())
        }
        other => Err(AppError::BadRequest(format!(
            "Unknown export format: {other} (expected csv or json)"
        ))),
    }
}

/// Render entries as CSV: the flat columns, then the details tagged-union
/// JSON as a single quoted field.
fn entries_to_csv(entries: &[FormEntry]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "id",
        "form_type",
        "created_at",
        "razao_social",
        "documento",
        "contato",
        "email",
        "telefone",
        "cep",
        "cidade",
        "uf",
        "details",
    ])?;

    for entry in entries {
        writer.write_record([
            entry.id.to_string().as_str(),
            &entry.form_type,
            &entry.created_at.to_rfc3339(),
            &entry.razao_social,
            &entry.documento,
            &entry.contato,
            &entry.email,
            &entry.telefone,
            &entry.cep,
            &entry.cidade,
            &entry.uf,
            &entry.details.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes).expect("csv writer emits valid UTF-8"))
}
