//! CEP lookup client for the ViaCEP public API.
//!
//! Wraps a single `GET /ws/{cep}/json/` call with a request timeout, typed
//! errors, and a process-local cache -- CEP-to-address mappings change
//! rarely, so repeated lookups should not re-hit the public service.

use std::collections::HashMap;
use std::time::Duration;

use balcao_core::cep::{normalize_cep, CepAddress};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Errors from the CEP lookup layer.
#[derive(Debug, thiserror::Error)]
pub enum CepError {
    /// The input did not reduce to 8 digits.
    #[error("Malformed CEP: expected 8 digits")]
    InvalidFormat,

    /// The service answered but knows no address for this CEP.
    #[error("CEP not found")]
    NotFound,

    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("CEP lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("CEP service returned HTTP {0}")]
    Upstream(u16),
}

/// Raw ViaCEP response payload.
///
/// An unknown CEP comes back as `200 OK` with `{"erro": true}` instead of
/// an HTTP error, so the flag must be checked before the address fields.
#[derive(Debug, Deserialize, Default)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

/// HTTP client for the CEP lookup service.
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
    cache: RwLock<HashMap<String, CepAddress>>,
}

impl CepClient {
    /// Create a client with a per-request timeout.
    ///
    /// * `base_url` - Service root, e.g. `https://viacep.com.br`.
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the address for a CEP, consulting the cache first.
    pub async fn lookup(&self, raw: &str) -> Result<CepAddress, CepError> {
        let cep = normalize_cep(raw).ok_or(CepError::InvalidFormat)?;

        if let Some(hit) = self.cache.read().await.get(&cep) {
            tracing::debug!(%cep, "CEP cache hit");
            return Ok(hit.clone());
        }

        let url = format!("{}/ws/{}/json/", self.base_url, cep);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CepError::Upstream(response.status().as_u16()));
        }

        let payload: ViaCepResponse = response.json().await?;
        if payload.erro.is_some() {
            return Err(CepError::NotFound);
        }

        let address = CepAddress {
            cep: cep.clone(),
            logradouro: payload.logradouro,
            complemento: payload.complemento,
            bairro: payload.bairro,
            cidade: payload.localidade,
            uf: payload.uf,
        };

        self.cache.write().await.insert(cep, address.clone());
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_found_payload() {
        let payload: ViaCepResponse = serde_json::from_str(
            r#"{
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "complemento": "de 612 a 1510 - lado par",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP",
                "ddd": "11"
            }"#,
        )
        .unwrap();

        assert!(payload.erro.is_none());
        assert_eq!(payload.localidade, "São Paulo");
        assert_eq!(payload.uf, "SP");
    }

    #[test]
    fn test_parses_erro_payload() {
        // ViaCEP answers 200 OK with an erro flag for unknown CEPs.
        let payload: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(payload.erro.is_some());

        // Some deployments return the flag as a string.
        let payload: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(payload.erro.is_some());
    }
}
