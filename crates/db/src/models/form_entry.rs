//! Form entry entity model and DTOs.
//!
//! Client and address fields live in plain columns so the raw-data viewer
//! can filter on them; the variant-specific fields are kept as the
//! tagged-union JSON in the `details` column.

use balcao_core::forms::{Address, ClientInfo, FormDetails, FormSubmission};
use balcao_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `form_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormEntry {
    pub id: DbId,
    /// Discriminator tag (`SERVICE`, `DEMONSTRACAO`, ...).
    pub form_type: String,
    pub created_by: DbId,
    pub razao_social: String,
    pub documento: String,
    pub contato: String,
    pub email: String,
    pub telefone: String,
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
    /// The serialized [`FormDetails`] variant, including its `form_type` tag.
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

impl FormEntry {
    /// Reconstruct the domain submission from the stored row.
    pub fn to_submission(&self) -> Result<FormSubmission, serde_json::Error> {
        let details: FormDetails = serde_json::from_value(self.details.clone())?;
        Ok(FormSubmission {
            client: ClientInfo {
                razao_social: self.razao_social.clone(),
                documento: self.documento.clone(),
                contato: self.contato.clone(),
                email: self.email.clone(),
                telefone: self.telefone.clone(),
            },
            address: Address {
                cep: self.cep.clone(),
                logradouro: self.logradouro.clone(),
                numero: self.numero.clone(),
                complemento: self.complemento.clone(),
                bairro: self.bairro.clone(),
                cidade: self.cidade.clone(),
                uf: self.uf.clone(),
            },
            details,
        })
    }
}

/// DTO for inserting a new form entry.
#[derive(Debug)]
pub struct NewFormEntry {
    pub form_type: String,
    pub created_by: DbId,
    pub razao_social: String,
    pub documento: String,
    pub contato: String,
    pub email: String,
    pub telefone: String,
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
    pub details: serde_json::Value,
}

impl NewFormEntry {
    /// Flatten a validated submission into the column layout.
    pub fn from_submission(
        created_by: DbId,
        submission: &FormSubmission,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            form_type: submission.details.form_type().as_str().to_string(),
            created_by,
            razao_social: submission.client.razao_social.clone(),
            documento: submission.client.documento.clone(),
            contato: submission.client.contato.clone(),
            email: submission.client.email.clone(),
            telefone: submission.client.telefone.clone(),
            cep: submission.address.cep.clone(),
            logradouro: submission.address.logradouro.clone(),
            numero: submission.address.numero.clone(),
            complemento: submission.address.complemento.clone(),
            bairro: submission.address.bairro.clone(),
            cidade: submission.address.cidade.clone(),
            uf: submission.address.uf.clone(),
            details: serde_json::to_value(&submission.details)?,
        })
    }
}

/// Filter for the raw-data viewer listing.
#[derive(Debug, Default)]
pub struct EntryFilter {
    /// Restrict to one form type tag.
    pub form_type: Option<String>,
    /// Substring match over client name and document.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
