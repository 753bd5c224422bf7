//! Handler for the CEP address lookup used by the form autofill.

use axum::extract::{Path, State};
use axum::Json;
use balcao_core::cep::CepAddress;

use crate::cep::CepError;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/cep/{cep}
///
/// Resolve a CEP to its address for form autofill. A known-unknown CEP is
/// 404; an unreachable upstream is 502 so the client can fall back to
/// manual entry.
pub async fn lookup(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(cep): Path<String>,
) -> AppResult<Json<DataResponse<CepAddress>>> {
    let address = state.cep.lookup(&cep).await.map_err(|err| match err {
        CepError::InvalidFormat => AppError::BadRequest("Malformed CEP: expected 8 digits".into()),
        CepError::NotFound => AppError::NotFound(format!("No address found for CEP {cep}")),
        CepError::Request(e) => AppError::BadGateway(format!("CEP lookup failed: {e}")),
        CepError::Upstream(status) => {
            AppError::BadGateway(format!("CEP service returned HTTP {status}"))
        }
    })?;

    Ok(Json(DataResponse::new(address)))
}
