//! CEP (Brazilian postal code) normalization and lookup result type.

use serde::{Deserialize, Serialize};

/// Normalize a CEP to its bare 8-digit form.
///
/// Accepts `01310-100` or `01310100`; anything that does not reduce to
/// exactly 8 digits is rejected.
pub fn normalize_cep(input: &str) -> Option<String> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// Address fields returned by a CEP lookup, used to pre-fill
/// [`Address`](crate::forms::Address).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepAddress {
    /// Normalized 8-digit CEP.
    pub cep: String,
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    pub bairro: String,
    /// City. ViaCEP calls this field `localidade`.
    #[serde(alias = "localidade")]
    pub cidade: String,
    pub uf: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_hyphenated_and_bare() {
        assert_eq!(normalize_cep("01310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_cep("01310100").as_deref(), Some("01310100"));
        assert_eq!(normalize_cep(" 01310-100 ").as_deref(), Some("01310100"));
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize_cep("1310").is_none());
        assert!(normalize_cep("01310-10a").is_none());
        assert!(normalize_cep("013101000").is_none());
        assert!(normalize_cep("").is_none());
    }
}
