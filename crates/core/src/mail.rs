//! Email composition and dispatch-link construction.
//!
//! A submitted form is relayed by handing the user's mail client a
//! pre-filled message through a `mailto:` or `outlook:` URI. The URI is a
//! fire-and-forget OS protocol handoff with no response channel, so the
//! contract here is only "compose a well-formed link": real delivery
//! confirmation would require an SMTP backend and is out of scope.
//!
//! Mail clients and browsers cap the URL length they accept. Subjects and
//! bodies are truncated at a character boundary so the final URI never
//! exceeds [`MAX_DISPATCH_URL_LEN`], and the link reports that it was
//! truncated. Recipient lists are never cut; their total size is bounded
//! by validation when the routing configuration is saved.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::forms::{FormDetails, FormSubmission};

/// Hard cap on the length of a generated dispatch URI.
///
/// Conservative lower bound across the mail clients observed in the field;
/// URIs beyond ~2000 characters are silently dropped by some handlers.
pub const MAX_DISPATCH_URL_LEN: usize = 1800;

/// Cap on the combined length of a configured recipient + CC list.
///
/// Keeps the address portion of a dispatch URI small enough that the
/// subject and body budgets in [`compose`] stay meaningful. Enforced when
/// the routing configuration is saved.
pub const MAX_ADDRESS_LIST_LEN: usize = 512;

/// Percent-encoding set for email addresses inside a URI.
///
/// Keeps the characters that are common in addresses readable.
const ADDRESS_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'+');

/// Which URI scheme the composed link uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchScheme {
    /// Standard `mailto:` URI, handled by the OS default mail client.
    Mailto,
    /// Vendor `outlook:compose?...` deep link, assumed registered on the host.
    Outlook,
}

impl DispatchScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchScheme::Mailto => "mailto",
            DispatchScheme::Outlook => "outlook",
        }
    }

    pub fn parse(tag: &str) -> Option<DispatchScheme> {
        match tag {
            "mailto" => Some(DispatchScheme::Mailto),
            "outlook" => Some(DispatchScheme::Outlook),
            _ => None,
        }
    }
}

/// Per-form-type routing configuration for composed mail.
#[derive(Debug, Clone)]
pub struct MailRoute {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    /// Prepended verbatim to the subject when non-empty.
    pub subject_prefix: String,
    pub scheme: DispatchScheme,
}

/// A fully composed message plus its dispatch URI.
#[derive(Debug, Clone, Serialize)]
pub struct MailLink {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    /// Plain-text body before encoding (and before any truncation).
    pub body: String,
    pub scheme: DispatchScheme,
    /// The percent-encoded dispatch URI, at most [`MAX_DISPATCH_URL_LEN`] long.
    pub url: String,
    /// True when the body had to be cut to fit the URI length cap.
    pub truncated: bool,
}

/// Compose the message and dispatch URI for a validated submission.
pub fn compose(route: &MailRoute, submission: &FormSubmission) -> MailLink {
    let form_type = submission.details.form_type();

    let mut subject = String::new();
    if !route.subject_prefix.is_empty() {
        subject.push_str(&route.subject_prefix);
        subject.push(' ');
    }
    subject.push_str(&format!(
        "[{}] {}",
        form_type.label(),
        submission.client.razao_social
    ));

    let body = render_body(submission);
    let (url, truncated) = build_url(route.scheme, &route.to, &route.cc, &subject, &body);

    MailLink {
        to: route.to.clone(),
        cc: route.cc.clone(),
        subject,
        body,
        scheme: route.scheme,
        url,
        truncated,
    }
}

/// Render the plain-text body: client block, address block, then the
/// variant's own field block.
fn render_body(submission: &FormSubmission) -> String {
    let mut out = String::new();
    let c = &submission.client;
    let a = &submission.address;

    out.push_str(&format!(
        "SOLICITAÇÃO: {}\n\n",
        submission.details.form_type().label().to_uppercase()
    ));

    out.push_str("== Cliente ==\n");
    push_field(&mut out, "Razão social", &c.razao_social);
    push_field(&mut out, "CPF/CNPJ", &c.documento);
    push_field(&mut out, "Contato", &c.contato);
    push_field(&mut out, "Email", &c.email);
    push_field(&mut out, "Telefone", &c.telefone);

    out.push_str("\n== Endereço ==\n");
    push_field(&mut out, "CEP", &a.cep);
    push_field(&mut out, "Logradouro", &a.logradouro);
    push_field(&mut out, "Número", &a.numero);
    if let Some(complemento) = &a.complemento {
        push_field(&mut out, "Complemento", complemento);
    }
    push_field(&mut out, "Bairro", &a.bairro);
    push_field(&mut out, "Cidade", &a.cidade);
    push_field(&mut out, "UF", &a.uf);

    out.push('\n');
    match &submission.details {
        FormDetails::Service {
            modelo,
            numero_serie,
            defeito,
            acessorios,
        } => {
            out.push_str("== Equipamento ==\n");
            push_field(&mut out, "Modelo", modelo);
            push_field(&mut out, "Número de série", numero_serie);
            push_field(&mut out, "Defeito relatado", defeito);
            if !acessorios.is_empty() {
                push_field(&mut out, "Acessórios", &acessorios.join(", "));
            }
        }
        FormDetails::Demonstracao {
            modelo,
            data_sugerida,
            observacoes,
        } => {
            out.push_str("== Demonstração ==\n");
            push_field(&mut out, "Modelo de interesse", modelo);
            push_date(&mut out, "Data sugerida", data_sugerida);
            push_optional(&mut out, "Observações", observacoes);
        }
        FormDetails::Aplicacao {
            modelo,
            aplicacao,
            data_sugerida,
        } => {
            out.push_str("== Aplicação ==\n");
            push_field(&mut out, "Modelo", modelo);
            push_field(&mut out, "Aplicação", aplicacao);
            push_date(&mut out, "Data sugerida", data_sugerida);
        }
        FormDetails::Password {
            modelo,
            numero_serie,
            codigo_atual,
            motivo,
        } => {
            out.push_str("== Licença/Senha ==\n");
            push_field(&mut out, "Modelo", modelo);
            push_field(&mut out, "Número de série", numero_serie);
            push_optional(&mut out, "Código atual", codigo_atual);
            push_field(&mut out, "Motivo", motivo);
        }
        FormDetails::InstalacaoDemo {
            modelo,
            local_instalacao,
            data_sugerida,
            observacoes,
        } => {
            out.push_str("== Instalação de Demonstração ==\n");
            push_field(&mut out, "Modelo", modelo);
            push_field(&mut out, "Local de instalação", local_instalacao);
            push_date(&mut out, "Data sugerida", data_sugerida);
            push_optional(&mut out, "Observações", observacoes);
        }
    }

    out
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label}: {value}\n"));
}

fn push_optional(out: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        push_field(out, label, value);
    }
}

fn push_date(out: &mut String, label: &str, value: &Option<chrono::NaiveDate>) {
    if let Some(date) = value {
        push_field(out, label, &date.format("%d/%m/%Y").to_string());
    }
}

/// Assemble the dispatch URI, truncating the subject and body so the whole
/// URI stays within the length cap. The subject can carry an arbitrarily
/// long client name, so it gets a budget of its own before the body takes
/// whatever room is left.
fn build_url(
    scheme: DispatchScheme,
    to: &[String],
    cc: &[String],
    subject: &str,
    body: &str,
) -> (String, bool) {
    let to_encoded = encode_addresses(to);
    let mut url = match scheme {
        DispatchScheme::Mailto => format!("mailto:{to_encoded}?"),
        DispatchScheme::Outlook => format!("outlook:compose?to={to_encoded}&"),
    };
    if !cc.is_empty() {
        url.push_str(&format!("cc={}&", encode_addresses(cc)));
    }

    url.push_str("subject=");
    let subject_budget = MAX_DISPATCH_URL_LEN.saturating_sub(url.len() + "&body=".len());
    let (encoded_subject, subject_cut) = encode_with_budget(subject, subject_budget);
    url.push_str(&encoded_subject);

    url.push_str("&body=");
    let body_budget = MAX_DISPATCH_URL_LEN.saturating_sub(url.len());
    let (encoded_body, body_cut) = encode_with_budget(body, body_budget);
    url.push_str(&encoded_body);

    (url, subject_cut || body_cut)
}

fn encode_addresses(addresses: &[String]) -> String {
    addresses
        .iter()
        .map(|a| utf8_percent_encode(a, ADDRESS_SET).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Percent-encode `body` one character at a time, stopping before the
/// encoded output would exceed `budget`. Never splits an encoded character.
fn encode_with_budget(body: &str, budget: usize) -> (String, bool) {
    let mut out = String::new();
    for ch in body.chars() {
        let mut buf = [0u8; 4];
        let encoded = utf8_percent_encode(ch.encode_utf8(&mut buf), NON_ALPHANUMERIC).to_string();
        if out.len() + encoded.len() > budget {
            return (out, true);
        }
        out.push_str(&encoded);
    }
    (out, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{Address, ClientInfo, FormDetails, FormSubmission};

    fn submission(details: FormDetails) -> FormSubmission {
        FormSubmission {
            client: ClientInfo {
                razao_social: "Clínica Boa Vista".into(),
                documento: "11.222.333/0001-81".into(),
                contato: "João Pereira".into(),
                email: "joao@boavista.com.br".into(),
                telefone: "(21) 3333-4444".into(),
            },
            address: Address {
                cep: "01310-100".into(),
                logradouro: "Av. Paulista".into(),
                numero: "1578".into(),
                complemento: Some("Sala 12".into()),
                bairro: "Bela Vista".into(),
                cidade: "São Paulo".into(),
                uf: "SP".into(),
            },
            details,
        }
    }

    fn service_details() -> FormDetails {
        FormDetails::Service {
            modelo: "UX-500".into(),
            numero_serie: "SN-0042".into(),
            defeito: "Não liga & exibe erro 100%".into(),
            acessorios: vec![],
        }
    }

    fn route(scheme: DispatchScheme) -> MailRoute {
        MailRoute {
            to: vec!["assistencia@example.com.br".into()],
            cc: vec!["vendas@example.com.br".into()],
            subject_prefix: "[PORTAL]".into(),
            scheme,
        }
    }

    #[test]
    fn test_subject_carries_label_and_client() {
        let link = compose(&route(DispatchScheme::Mailto), &submission(service_details()));
        assert_eq!(
            link.subject,
            "[PORTAL] [Serviço Técnico] Clínica Boa Vista"
        );
    }

    #[test]
    fn test_body_contains_variant_fields() {
        let link = compose(&route(DispatchScheme::Mailto), &submission(service_details()));
        assert!(link.body.contains("SOLICITAÇÃO: SERVIÇO TÉCNICO"));
        assert!(link.body.contains("Número de série: SN-0042"));
        assert!(link.body.contains("Defeito relatado: Não liga & exibe erro 100%"));
        assert!(link.body.contains("CEP: 01310-100"));
    }

    #[test]
    fn test_mailto_url_is_percent_encoded() {
        let link = compose(&route(DispatchScheme::Mailto), &submission(service_details()));
        assert!(link.url.starts_with("mailto:assistencia@example.com.br?"));
        assert!(link.url.contains("cc=vendas@example.com.br"));
        // Reserved characters from the body must not appear raw.
        assert!(!link.url.contains(' '));
        // '%' and '&' in the defect text must be escaped.
        assert!(link.url.contains("100%25"));
        assert!(link.url.contains("%26"));
    }

    #[test]
    fn test_outlook_scheme() {
        let link = compose(
            &route(DispatchScheme::Outlook),
            &submission(service_details()),
        );
        assert!(link.url.starts_with("outlook:compose?to="));
        assert_eq!(link.scheme, DispatchScheme::Outlook);
    }

    #[test]
    fn test_long_body_is_truncated_to_cap() {
        let details = FormDetails::Service {
            modelo: "UX-500".into(),
            numero_serie: "SN-0042".into(),
            defeito: "falha intermitente ".repeat(400),
            acessorios: vec![],
        };
        let link = compose(&route(DispatchScheme::Mailto), &submission(details));
        assert!(link.truncated, "oversized body must be flagged");
        assert!(
            link.url.len() <= MAX_DISPATCH_URL_LEN,
            "url length {} exceeds cap",
            link.url.len()
        );
    }

    #[test]
    fn test_huge_client_name_keeps_url_under_cap() {
        // The client name flows into the subject, which has no inherent
        // length bound of its own.
        let mut sub = submission(service_details());
        sub.client.razao_social = "Companhia Brasileira de Equipamentos ".repeat(80);
        let link = compose(&route(DispatchScheme::Mailto), &sub);
        assert!(link.truncated);
        assert!(
            link.url.len() <= MAX_DISPATCH_URL_LEN,
            "url length {} exceeds cap",
            link.url.len()
        );
    }

    #[test]
    fn test_huge_subject_prefix_keeps_url_under_cap() {
        let mut r = route(DispatchScheme::Outlook);
        r.subject_prefix = "[PORTAL DE ASSISTÊNCIA TÉCNICA] ".repeat(120);
        let link = compose(&r, &submission(service_details()));
        assert!(link.truncated);
        assert!(link.url.len() <= MAX_DISPATCH_URL_LEN);
    }

    #[test]
    fn test_short_body_is_not_truncated() {
        let link = compose(&route(DispatchScheme::Mailto), &submission(service_details()));
        assert!(!link.truncated);
    }

    #[test]
    fn test_scheme_round_trip() {
        for scheme in [DispatchScheme::Mailto, DispatchScheme::Outlook] {
            assert_eq!(DispatchScheme::parse(scheme.as_str()), Some(scheme));
        }
        assert_eq!(DispatchScheme::parse("smtp"), None);
    }
}
