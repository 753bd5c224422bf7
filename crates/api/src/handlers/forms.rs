//! Handlers for the `/forms` resource: submission, raw-data listing,
//! attachment download, and deletion.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use balcao_core::error::CoreError;
use balcao_core::forms::{FormSubmission, FormType};
use balcao_core::mail::{compose, DispatchScheme, MailLink, MailRoute};
use balcao_core::types::DbId;
use balcao_db::models::attachment::{AttachmentMeta, NewAttachment};
use balcao_db::models::form_entry::{EntryFilter, FormEntry, NewFormEntry};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One attachment uploaded alongside a submission.
#[derive(Debug, Deserialize)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub mime_type: String,
    /// Base64-encoded file content.
    pub data_base64: String,
}

/// Request body for `POST /forms`.
#[derive(Debug, Deserialize)]
pub struct SubmitFormRequest {
    #[serde(flatten)]
    pub submission: FormSubmission,
    #[serde(default)]
    pub attachments: Vec<AttachmentUpload>,
}

/// Response body for a created or fetched entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry: FormEntry,
    pub attachments: Vec<AttachmentMeta>,
    /// Pre-composed dispatch link, absent when no recipients are configured
    /// for the entry's form type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailLink>,
}

/// Query parameters for `GET /forms`.
#[derive(Debug, Deserialize, Default)]
pub struct ListEntriesQuery {
    pub form_type: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/forms
///
/// Validate and persist a submission, store its attachments, and compose
/// the dispatch mail link from the form type's email configuration.
pub async fn submit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<SubmitFormRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<EntryResponse>>)> {
    // 1. Run domain validation before touching the database.
    input.submission.validate()?;

    // 2. Decode attachments up front so an oversized or corrupt upload
    //    rejects the whole submission.
    let mut decoded: Vec<(AttachmentUpload, usize)> = Vec::with_capacity(input.attachments.len());
    for upload in input.attachments {
        let bytes = BASE64.decode(upload.data_base64.as_bytes()).map_err(|_| {
            AppError::BadRequest(format!(
                "Attachment '{}' is not valid base64",
                upload.file_name
            ))
        })?;
        if bytes.len() > state.config.max_attachment_bytes {
            return Err(AppError::BadRequest(format!(
                "Attachment '{}' exceeds the {} byte limit",
                upload.file_name, state.config.max_attachment_bytes
            )));
        }
        if upload.file_name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Attachment file name must not be empty".into(),
            )));
        }
        decoded.push((upload, bytes.len()));
    }

    // 3. Persist the entry and its attachments atomically; a failure on
    //    any attachment must not leave a half-written entry behind.
    let new_entry = NewFormEntry::from_submission(auth_user.user_id, &input.submission)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize details: {e}")))?;

    let mut tx = state.pool.begin().await?;
    let entry = balcao_db::repositories::FormEntryRepo::create(&mut *tx, &new_entry).await?;
    for (upload, size) in decoded {
        let new_attachment = NewAttachment {
            entry_id: entry.id,
            file_name: upload.file_name,
            size_bytes: size as i64,
            mime_type: upload.mime_type,
            data_base64: upload.data_base64,
        };
        balcao_db::repositories::AttachmentRepo::create(&mut *tx, &new_attachment).await?;
    }
    tx.commit().await?;

    // 4. Read back attachment metadata for the response.
    let attachments =
        balcao_db::repositories::AttachmentRepo::list_meta_for_entry(&state.pool, entry.id)
            .await?;

    // 5. Compose the dispatch mail link from the configured route.
    let mail = compose_for_entry(&state, &entry.form_type, &input.submission).await?;

    tracing::info!(
        entry_id = entry.id,
        form_type = %entry.form_type,
        user_id = auth_user.user_id,
        "form entry created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(EntryResponse {
            entry,
            attachments,
            mail,
        })),
    ))
}

/// GET /api/v1/forms
///
/// Raw-data listing, newest first, with optional form-type filter and
/// substring search.
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<ListEntriesQuery>,
) -> AppResult<Json<DataResponse<Vec<FormEntry>>>> {
    let form_type = match query.form_type {
        Some(tag) => {
            let parsed = FormType::parse(&tag)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown form type: {tag}")))?;
            Some(parsed.as_str().to_string())
        }
        None => None,
    };

    let filter = EntryFilter {
        form_type,
        search: query.search.filter(|s| !s.trim().is_empty()),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let entries = balcao_db::repositories::FormEntryRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(entries)))
}

/// GET /api/v1/forms/{id}
///
/// Fetch one entry with its attachment metadata and a freshly composed
/// dispatch link (for the "resend" action).
pub async fn get(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EntryResponse>>> {
    let entry = balcao_db::repositories::FormEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "form_entry",
            id,
        }))?;

    let attachments =
        balcao_db::repositories::AttachmentRepo::list_meta_for_entry(&state.pool, id).await?;

    let submission = entry
        .to_submission()
        .map_err(|e| AppError::InternalError(format!("Stored details are malformed: {e}")))?;
    let mail = compose_for_entry(&state, &entry.form_type, &submission).await?;

    Ok(Json(DataResponse::new(EntryResponse {
        entry,
        attachments,
        mail,
    })))
}

/// GET /api/v1/forms/{id}/attachments
pub async fn list_attachments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AttachmentMeta>>>> {
    // Distinguish "entry has no attachments" from "entry does not exist".
    if balcao_db::repositories::FormEntryRepo::find_by_id(&state.pool, id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "form_entry",
            id,
        }));
    }

    let attachments =
        balcao_db::repositories::AttachmentRepo::list_meta_for_entry(&state.pool, id).await?;
    Ok(Json(DataResponse::new(attachments)))
}

/// GET /api/v1/forms/{id}/attachments/{attachment_id}
///
/// Stream the decoded attachment bytes with download headers.
pub async fn download_attachment(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path((id, attachment_id)): Path<(DbId, DbId)>,
) -> AppResult<(HeaderMap, Vec<u8>)> {
    let attachment =
        balcao_db::repositories::AttachmentRepo::find_for_entry(&state.pool, id, attachment_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::NotFound {
                entity: "attachment",
                id: attachment_id,
            }))?;

    let bytes = BASE64
        .decode(attachment.data_base64.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Stored attachment is corrupt: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&attachment.mime_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment.file_name.replace('"', "")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    Ok((headers, bytes))
}

/// DELETE /api/v1/forms/{id}
///
/// Admin only. Attachments cascade. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = balcao_db::repositories::FormEntryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "form_entry",
            id,
        }));
    }

    tracing::info!(entry_id = id, admin_id = admin.user_id, "form entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compose the mail link for an entry from its form type's email
/// configuration. Returns `None` when no recipients are configured.
async fn compose_for_entry(
    state: &AppState,
    form_type: &str,
    submission: &FormSubmission,
) -> AppResult<Option<MailLink>> {
    let config =
        balcao_db::repositories::EmailConfigRepo::find_by_form_type(&state.pool, form_type)
            .await?;

    let Some(config) = config else {
        return Ok(None);
    };
    if config.recipients.is_empty() {
        return Ok(None);
    }

    let scheme = DispatchScheme::parse(&config.scheme).unwrap_or(DispatchScheme::Mailto);
    let route = MailRoute {
        to: config.recipients,
        cc: config.cc,
        subject_prefix: config.subject_prefix,
        scheme,
    };

    Ok(Some(compose(&route, submission)))
}
