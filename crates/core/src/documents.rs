//! CPF/CNPJ checksum validation and canonical formatting.
//!
//! Both Brazilian taxpayer registry numbers carry two modulo-11 check
//! digits. Validation accepts punctuated or bare input, rejects
//! repeated-digit sequences (formally checksum-valid but never issued),
//! and verifies both digits.

/// Strip every non-digit character from `input`.
pub fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CPF (11-digit individual taxpayer number).
///
/// Accepts punctuated (`000.000.000-00`) or bare input.
pub fn validate_cpf(input: &str) -> bool {
    let d = to_digit_values(input, 11);
    let Some(d) = d else { return false };

    let dv1 = check_digit(&d[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let dv2 = check_digit(&d[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[9] == dv1 && d[10] == dv2
}

/// Validate a CNPJ (14-digit company taxpayer number).
///
/// Accepts punctuated (`00.000.000/0000-00`) or bare input.
pub fn validate_cnpj(input: &str) -> bool {
    let d = to_digit_values(input, 14);
    let Some(d) = d else { return false };

    let dv1 = check_digit(&d[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let dv2 = check_digit(&d[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[12] == dv1 && d[13] == dv2
}

/// Validate a client document of either kind, dispatching on digit count.
///
/// 11 digits are checked as CPF, 14 as CNPJ; any other length is invalid.
pub fn validate_document(input: &str) -> bool {
    match digits(input).len() {
        11 => validate_cpf(input),
        14 => validate_cnpj(input),
        _ => false,
    }
}

/// Format an 11-digit string as `000.000.000-00`.
///
/// Returns `None` when the input does not contain exactly 11 digits.
/// Formatting then stripping non-digits round-trips to the original digits.
pub fn format_cpf(input: &str) -> Option<String> {
    let d = digits(input);
    if d.len() != 11 {
        return None;
    }
    Some(format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]))
}

/// Format a 14-digit string as `00.000.000/0000-00`.
///
/// Returns `None` when the input does not contain exactly 14 digits.
pub fn format_cnpj(input: &str) -> Option<String> {
    let d = digits(input);
    if d.len() != 14 {
        return None;
    }
    Some(format!(
        "{}.{}.{}/{}-{}",
        &d[..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..]
    ))
}

/// Parse `input` into exactly `len` digit values, rejecting repeated-digit
/// sequences such as `111.111.111-11`.
fn to_digit_values(input: &str, len: usize) -> Option<Vec<u32>> {
    let d: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != len {
        return None;
    }
    if d.iter().all(|&v| v == d[0]) {
        return None;
    }
    Some(d)
}

/// Compute a modulo-11 check digit over `values` with the given weights.
///
/// A remainder below 2 yields 0; otherwise the digit is `11 - remainder`.
fn check_digit(values: &[u32], weights: &[u32]) -> u32 {
    debug_assert_eq!(values.len(), weights.len());
    let sum: u32 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    let rem = sum % 11;
    if rem < 2 {
        0
    } else {
        11 - rem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Checksum-valid reference numbers (not real registrations).
    const VALID_CPF: &str = "529.982.247-25";
    const VALID_CNPJ: &str = "11.222.333/0001-81";

    #[test]
    fn test_valid_cpf_passes() {
        assert!(validate_cpf(VALID_CPF));
        assert!(validate_cpf("52998224725"), "bare digits must also pass");
    }

    #[test]
    fn test_valid_cnpj_passes() {
        assert!(validate_cnpj(VALID_CNPJ));
        assert!(validate_cnpj("11222333000181"));
    }

    #[test]
    fn test_mutated_check_digits_fail() {
        // Mutate each check digit of the valid CPF in turn.
        for (replacement, expected) in [("26", "25"), ("35", "25")] {
            let mutated = VALID_CPF.replace(expected, replacement);
            assert!(!validate_cpf(&mutated), "mutation {mutated} must fail");
        }

        // Every possible wrong final digit must fail.
        for wrong in 0..10 {
            if wrong == 5 {
                continue;
            }
            let mutated = format!("5299822472{wrong}");
            assert!(!validate_cpf(&mutated), "{mutated} must fail");
        }
        for wrong in 0..10 {
            if wrong == 1 {
                continue;
            }
            let mutated = format!("1122233300018{wrong}");
            assert!(!validate_cnpj(&mutated), "{mutated} must fail");
        }
    }

    #[test]
    fn test_repeated_digit_sequences_fail() {
        for digit in 0..10 {
            let cpf: String = digit.to_string().repeat(11);
            assert!(!validate_cpf(&cpf), "{cpf} must fail");
            let cnpj: String = digit.to_string().repeat(14);
            assert!(!validate_cnpj(&cnpj), "{cnpj} must fail");
        }
    }

    #[test]
    fn test_wrong_length_fails() {
        assert!(!validate_cpf("1234567890"));
        assert!(!validate_cpf("123456789012"));
        assert!(!validate_cnpj("1234567890123"));
        assert!(!validate_document(""));
        assert!(!validate_document("12345"));
    }

    #[test]
    fn test_document_dispatches_on_length() {
        assert!(validate_document(VALID_CPF));
        assert!(validate_document(VALID_CNPJ));
    }

    #[test]
    fn test_format_round_trip() {
        let formatted = format_cpf("52998224725").unwrap();
        assert_eq!(formatted, "529.982.247-25");
        assert_eq!(digits(&formatted), "52998224725");

        let formatted = format_cnpj("11222333000181").unwrap();
        assert_eq!(formatted, "11.222.333/0001-81");
        assert_eq!(digits(&formatted), "11222333000181");
    }

    #[test]
    fn test_format_rejects_wrong_length() {
        assert!(format_cpf("123").is_none());
        assert!(format_cnpj("52998224725").is_none());
    }
}
