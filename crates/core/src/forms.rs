//! Service-request form model: one tagged variant per form type.
//!
//! Each variant carries only the fields that form actually requires, so a
//! submission cannot silently drift between field schemas. Validation walks
//! the variant's required fields in a fixed order and rejects on the first
//! empty one, naming the field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::documents::validate_document;
use crate::error::CoreError;

/// Discriminator tag selecting which field schema and email template apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    #[serde(rename = "SERVICE")]
    Service,
    #[serde(rename = "DEMONSTRACAO")]
    Demonstracao,
    #[serde(rename = "APLICACAO")]
    Aplicacao,
    #[serde(rename = "PASSWORD")]
    Password,
    #[serde(rename = "INSTALACAO_DEMO")]
    InstalacaoDemo,
}

impl FormType {
    /// All form types, in menu order.
    pub const ALL: [FormType; 5] = [
        FormType::Service,
        FormType::Demonstracao,
        FormType::Aplicacao,
        FormType::Password,
        FormType::InstalacaoDemo,
    ];

    /// The wire/database tag (e.g. `"SERVICE"`).
    pub fn as_str(self) -> &'static str {
        match self {
            FormType::Service => "SERVICE",
            FormType::Demonstracao => "DEMONSTRACAO",
            FormType::Aplicacao => "APLICACAO",
            FormType::Password => "PASSWORD",
            FormType::InstalacaoDemo => "INSTALACAO_DEMO",
        }
    }

    /// Human-readable label used in email subjects and bodies.
    pub fn label(self) -> &'static str {
        match self {
            FormType::Service => "Serviço Técnico",
            FormType::Demonstracao => "Demonstração",
            FormType::Aplicacao => "Aplicação",
            FormType::Password => "Licença/Senha",
            FormType::InstalacaoDemo => "Instalação de Demonstração",
        }
    }

    /// Parse a wire/database tag back into a form type.
    pub fn parse(tag: &str) -> Option<FormType> {
        FormType::ALL.into_iter().find(|ft| ft.as_str() == tag)
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requesting client, shared by every form variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Company or individual name.
    pub razao_social: String,
    /// CPF or CNPJ, punctuated or bare.
    pub documento: String,
    /// Contact person.
    pub contato: String,
    pub email: String,
    pub telefone: String,
}

/// Service address, shared by every form variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    #[serde(default)]
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    /// Two-letter state code.
    pub uf: String,
}

/// Variant-specific form fields, tagged by `form_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "form_type")]
pub enum FormDetails {
    /// Technical service request for a faulty unit.
    #[serde(rename = "SERVICE")]
    Service {
        modelo: String,
        numero_serie: String,
        defeito: String,
        #[serde(default)]
        acessorios: Vec<String>,
    },

    /// Equipment demonstration request.
    #[serde(rename = "DEMONSTRACAO")]
    Demonstracao {
        modelo: String,
        #[serde(default)]
        data_sugerida: Option<NaiveDate>,
        #[serde(default)]
        observacoes: String,
    },

    /// Application/procedure training request.
    #[serde(rename = "APLICACAO")]
    Aplicacao {
        modelo: String,
        aplicacao: String,
        #[serde(default)]
        data_sugerida: Option<NaiveDate>,
    },

    /// License or unlock-password request for an installed unit.
    #[serde(rename = "PASSWORD")]
    Password {
        modelo: String,
        numero_serie: String,
        #[serde(default)]
        codigo_atual: String,
        motivo: String,
    },

    /// Installation of a demonstration unit on the client's site.
    #[serde(rename = "INSTALACAO_DEMO")]
    InstalacaoDemo {
        modelo: String,
        local_instalacao: String,
        #[serde(default)]
        data_sugerida: Option<NaiveDate>,
        #[serde(default)]
        observacoes: String,
    },
}

impl FormDetails {
    /// The discriminator for this variant.
    pub fn form_type(&self) -> FormType {
        match self {
            FormDetails::Service { .. } => FormType::Service,
            FormDetails::Demonstracao { .. } => FormType::Demonstracao,
            FormDetails::Aplicacao { .. } => FormType::Aplicacao,
            FormDetails::Password { .. } => FormType::Password,
            FormDetails::InstalacaoDemo { .. } => FormType::InstalacaoDemo,
        }
    }
}

/// A complete form submission as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSubmission {
    pub client: ClientInfo,
    pub address: Address,
    pub details: FormDetails,
}

impl FormSubmission {
    /// Validate the submission, rejecting on the first missing required
    /// field. The returned error names the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.validate_client()?;
        self.validate_address()?;
        self.validate_details()
    }

    fn validate_client(&self) -> Result<(), CoreError> {
        let c = &self.client;
        require("razao_social", &c.razao_social)?;
        require("documento", &c.documento)?;
        if !validate_document(&c.documento) {
            return Err(CoreError::Validation(
                "Invalid CPF/CNPJ check digits".into(),
            ));
        }
        require("contato", &c.contato)?;
        require("email", &c.email)?;
        if !plausible_email(&c.email) {
            return Err(CoreError::Validation(format!(
                "Malformed email address: {}",
                c.email
            )));
        }
        require("telefone", &c.telefone)
    }

    fn validate_address(&self) -> Result<(), CoreError> {
        let a = &self.address;
        require("cep", &a.cep)?;
        if crate::cep::normalize_cep(&a.cep).is_none() {
            return Err(CoreError::Validation(format!("Malformed CEP: {}", a.cep)));
        }
        require("logradouro", &a.logradouro)?;
        require("numero", &a.numero)?;
        require("bairro", &a.bairro)?;
        require("cidade", &a.cidade)?;
        require("uf", &a.uf)?;
        if a.uf.len() != 2 || !a.uf.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::Validation(format!(
                "UF must be a two-letter state code, got: {}",
                a.uf
            )));
        }
        Ok(())
    }

    fn validate_details(&self) -> Result<(), CoreError> {
        match &self.details {
            FormDetails::Service {
                modelo,
                numero_serie,
                defeito,
                ..
            } => {
                require("modelo", modelo)?;
                require("numero_serie", numero_serie)?;
                require("defeito", defeito)
            }
            FormDetails::Demonstracao { modelo, .. } => require("modelo", modelo),
            FormDetails::Aplicacao {
                modelo, aplicacao, ..
            } => {
                require("modelo", modelo)?;
                require("aplicacao", aplicacao)
            }
            FormDetails::Password {
                modelo,
                numero_serie,
                motivo,
                ..
            } => {
                require("modelo", modelo)?;
                require("numero_serie", numero_serie)?;
                require("motivo", motivo)
            }
            FormDetails::InstalacaoDemo {
                modelo,
                local_instalacao,
                ..
            } => {
                require("modelo", modelo)?;
                require("local_instalacao", local_instalacao)
            }
        }
    }
}

/// Reject when `value` is empty or whitespace-only, naming `field`.
fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Required field is empty: {field}"
        )));
    }
    Ok(())
}

/// Cheap plausibility check; full address verification is out of scope.
pub fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn valid_submission() -> FormSubmission {
        FormSubmission {
            client: ClientInfo {
                razao_social: "Hospital Santa Clara Ltda".into(),
                documento: "11.222.333/0001-81".into(),
                contato: "Maria Souza".into(),
                email: "maria@santaclara.com.br".into(),
                telefone: "(11) 98765-4321".into(),
            },
            address: Address {
                cep: "01310-100".into(),
                logradouro: "Av. Paulista".into(),
                numero: "1578".into(),
                complemento: None,
                bairro: "Bela Vista".into(),
                cidade: "São Paulo".into(),
                uf: "SP".into(),
            },
            details: FormDetails::Service {
                modelo: "UX-500".into(),
                numero_serie: "SN-0042".into(),
                defeito: "Não liga".into(),
                acessorios: vec!["cabo de força".into()],
            },
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        valid_submission().validate().expect("must validate");
    }

    #[test]
    fn test_missing_required_field_names_it() {
        let mut sub = valid_submission();
        sub.client.razao_social = "   ".into();
        let err = sub.validate().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("razao_social"));

        let mut sub = valid_submission();
        sub.details = FormDetails::Password {
            modelo: "UX-500".into(),
            numero_serie: "SN-0042".into(),
            codigo_atual: String::new(),
            motivo: String::new(),
        };
        let err = sub.validate().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("motivo"));
    }

    #[test]
    fn test_bad_document_rejected() {
        let mut sub = valid_submission();
        sub.client.documento = "111.111.111-11".into();
        let err = sub.validate().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("CPF/CNPJ"));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut sub = valid_submission();
        sub.client.email = "not-an-email".into();
        assert!(sub.validate().is_err());
    }

    #[test]
    fn test_bad_cep_rejected() {
        let mut sub = valid_submission();
        sub.address.cep = "1310".into();
        assert!(sub.validate().is_err());
    }

    #[test]
    fn test_details_round_trips_with_tag() {
        let details = FormDetails::Demonstracao {
            modelo: "UX-500".into(),
            data_sugerida: None,
            observacoes: String::new(),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["form_type"], "DEMONSTRACAO");

        let back: FormDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back.form_type(), FormType::Demonstracao);
    }

    #[test]
    fn test_form_type_parse() {
        for ft in FormType::ALL {
            assert_eq!(FormType::parse(ft.as_str()), Some(ft));
        }
        assert_eq!(FormType::parse("UNKNOWN"), None);
    }
}
