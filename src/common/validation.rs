// src/common/validation.rs

//! Máscaras e validações dos campos de formulário (telefone, CPF/CNPJ, CEP,
//! e-mail e Instagram).
//!
//! As funções `format_*` são aplicadas a cada alteração do campo e nunca
//! falham. As funções `validate_*` são predicados puros usados no envio.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex de e-mail"));
// (XX) XXXX-XXXX
static PHONE_10_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([0-9]{2}\)\s?[0-9]{4}-[0-9]{4}$").expect("regex de telefone fixo"));
// (XX) XXXXX-XXXX
static PHONE_11_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([0-9]{2}\)\s?[0-9]{5}-[0-9]{4}$").expect("regex de celular"));
static INSTAGRAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._]{1,30}$").expect("regex de Instagram"));
static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}-[0-9]{3}$").expect("regex de CEP"));

const PHONE_MAX_DIGITS: usize = 11;
const CPF_DIGITS: usize = 11;
const CNPJ_DIGITS: usize = 14;
const ZIP_DIGITS: usize = 8;
const INSTAGRAM_MAX_CHARS: usize = 30;

/// Mantém apenas os dígitos ASCII de `value`.
pub fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn limit(digits: &str, max: usize) -> &str {
    // Só contém dígitos ASCII, então fatiar por bytes é seguro.
    &digits[..digits.len().min(max)]
}

// ---
// E-mail
// ---

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

// ---
// Telefone
// ---

/// Valida `(XX) XXXX-XXXX` ou `(XX) XXXXX-XXXX` (espaço após o DDD opcional).
pub fn validate_phone(phone: &str) -> bool {
    let digits = only_digits(phone);
    if digits.len() != 10 && digits.len() != 11 {
        return false;
    }

    PHONE_10_RE.is_match(phone) || PHONE_11_RE.is_match(phone)
}

pub fn format_phone(value: &str) -> String {
    let all = only_digits(value);
    let d = limit(&all, PHONE_MAX_DIGITS);

    match d.len() {
        0..=2 => d.to_string(),
        3..=6 => format!("({}) {}", &d[..2], &d[2..]),
        7..=10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
    }
}

// ---
// CPF / CNPJ
// ---

fn is_uniform(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn to_numbers(digits: &str) -> Vec<u32> {
    digits.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn cpf_check_digit(numbers: &[u32]) -> u32 {
    // Pesos decrescentes terminando em 2: 10..2 no primeiro dígito, 11..2 no segundo.
    let top = numbers.len() as u32 + 1;
    let sum: u32 = numbers
        .iter()
        .enumerate()
        .map(|(i, n)| n * (top - i as u32))
        .sum();

    let remainder = (sum * 10) % 11;
    if remainder == 10 || remainder == 11 { 0 } else { remainder }
}

/// Valida um CPF (pessoa física) pelos dois dígitos verificadores.
pub fn validate_cpf(cpf: &str) -> bool {
    let numbers = to_numbers(&only_digits(cpf));
    if numbers.len() != CPF_DIGITS || is_uniform(&numbers) {
        return false;
    }

    cpf_check_digit(&numbers[..9]) == numbers[9] && cpf_check_digit(&numbers[..10]) == numbers[10]
}

fn cnpj_check_digit(numbers: &[u32]) -> u32 {
    // Pesos 2..9 aplicados da direita para a esquerda, reiniciando em 2.
    let mut pos = numbers.len() as u32 - 7;
    let mut sum = 0;
    for n in numbers {
        sum += n * pos;
        pos -= 1;
        if pos < 2 {
            pos = 9;
        }
    }

    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Valida um CNPJ (pessoa jurídica) pelos dois dígitos verificadores.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let numbers = to_numbers(&only_digits(cnpj));
    if numbers.len() != CNPJ_DIGITS || is_uniform(&numbers) {
        return false;
    }

    cnpj_check_digit(&numbers[..12]) == numbers[12]
        && cnpj_check_digit(&numbers[..13]) == numbers[13]
}

/// CPF ou CNPJ, decidido pela quantidade de dígitos.
pub fn validate_document(document: &str) -> bool {
    match only_digits(document).len() {
        CPF_DIGITS => validate_cpf(document),
        CNPJ_DIGITS => validate_cnpj(document),
        _ => false,
    }
}

/// Máscara `XXX.XXX.XXX-XX` até 11 dígitos, `XX.XXX.XXX/XXXX-XX` acima disso.
pub fn format_document(value: &str) -> String {
    let all = only_digits(value);

    if all.len() <= CPF_DIGITS {
        let d = all.as_str();
        return match d.len() {
            0..=3 => d.to_string(),
            4..=6 => format!("{}.{}", &d[..3], &d[3..]),
            7..=9 => format!("{}.{}.{}", &d[..3], &d[3..6], &d[6..]),
            _ => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
        };
    }

    let d = limit(&all, CNPJ_DIGITS);
    match d.len() {
        // Com mais de 11 dígitos só sobram os dois últimos braços.
        0..=12 => format!("{}.{}.{}/{}", &d[..2], &d[2..5], &d[5..8], &d[8..]),
        _ => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        ),
    }
}

// ---
// Instagram
// ---

/// Campo opcional: vazio é válido. Aceita um `@` inicial.
pub fn validate_instagram(handle: &str) -> bool {
    if handle.is_empty() {
        return true;
    }

    let clean = handle.strip_prefix('@').unwrap_or(handle);
    INSTAGRAM_RE.is_match(clean)
}

pub fn format_instagram(value: &str) -> String {
    let handle: String = value
        .trim_start_matches('@')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
        .take(INSTAGRAM_MAX_CHARS)
        .collect();

    if handle.is_empty() {
        String::new()
    } else {
        format!("@{handle}")
    }
}

// ---
// CEP
// ---

pub fn validate_zip_code(zip_code: &str) -> bool {
    ZIP_RE.is_match(zip_code)
}

pub fn format_zip_code(value: &str) -> String {
    let all = only_digits(value);
    let d = limit(&all, ZIP_DIGITS);

    if d.len() <= 5 {
        d.to_string()
    } else {
        format!("{}-{}", &d[..5], &d[5..])
    }
}

// ---
// UF
// ---

/// Sigla do estado: maiúsculas, no máximo dois caracteres.
pub fn format_state(value: &str) -> String {
    value.to_uppercase().chars().take(2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CPF: &str = "529.982.247-25";
    const VALID_CNPJ: &str = "11.222.333/0001-81";

    #[test]
    fn cpf_with_correct_check_digits_is_valid() {
        assert!(validate_cpf(VALID_CPF));
        assert!(validate_cpf("52998224725"));
        assert!(validate_document(VALID_CPF));
    }

    #[test]
    fn cpf_with_wrong_check_digit_is_rejected() {
        assert!(!validate_cpf("529.982.247-24"));
        assert!(!validate_cpf("529.982.247-15"));
        // dígito do corpo alterado
        assert!(!validate_document("529.982.248-25"));
    }

    #[test]
    fn uniform_documents_are_always_rejected() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            let cnpj = d.to_string().repeat(14);
            assert!(!validate_document(&cpf), "{cpf}");
            assert!(!validate_document(&cnpj), "{cnpj}");
        }
    }

    #[test]
    fn cnpj_with_correct_check_digits_is_valid() {
        assert!(validate_cnpj(VALID_CNPJ));
        assert!(validate_document("11222333000181"));
    }

    #[test]
    fn cnpj_with_incremented_last_digit_is_rejected() {
        assert!(!validate_document("11222333000182"));
        assert!(!validate_document("11.222.333/0001-80"));
    }

    #[test]
    fn document_with_unexpected_length_is_rejected() {
        assert!(!validate_document(""));
        assert!(!validate_document("5299822472"));
        assert!(!validate_document("112223330001811"));
    }

    #[test]
    fn format_document_masks_cpf_progressively() {
        assert_eq!(format_document("529"), "529");
        assert_eq!(format_document("5299"), "529.9");
        assert_eq!(format_document("5299822"), "529.982.2");
        assert_eq!(format_document("52998224725"), VALID_CPF);
        assert_eq!(format_document("529.982.247-25"), VALID_CPF);
    }

    #[test]
    fn format_document_switches_to_cnpj_after_eleven_digits() {
        assert_eq!(format_document("112223330001"), "11.222.333/0001");
        assert_eq!(format_document("11222333000181"), VALID_CNPJ);
        assert_eq!(format_document("1122233300018199"), VALID_CNPJ);
    }

    #[test]
    fn format_phone_masks_progressively() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("11"), "11");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("1198765"), "(11) 9876-5");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("119876543210000"), "(11) 98765-4321");
    }

    #[test]
    fn format_phone_is_idempotent() {
        for input in ["11987654321", "1133334444", "(11) 98765-4321", "abc11 9"] {
            let once = format_phone(input);
            assert_eq!(format_phone(&once), once);
        }
    }

    #[test]
    fn validate_phone_accepts_both_layouts() {
        assert!(validate_phone("(11) 3333-4444"));
        assert!(validate_phone("(11) 98765-4321"));
        assert!(validate_phone("(11)98765-4321"));
        assert!(!validate_phone("11987654321"));
        assert!(!validate_phone("(11) 9876-54321"));
        assert!(!validate_phone("(1) 98765-4321"));
    }

    #[test]
    fn validate_email_requires_user_domain_and_tld() {
        assert!(validate_email("contato@trampocerto.com.br"));
        assert!(!validate_email("contato@trampocerto"));
        assert!(!validate_email("contato trampo@x.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn zip_code_format_and_validation() {
        assert_eq!(format_zip_code("12345678"), "12345-678");
        assert_eq!(format_zip_code("12345"), "12345");
        assert_eq!(format_zip_code("12.345-6789"), "12345-678");
        assert!(validate_zip_code("12345-678"));
        assert!(!validate_zip_code("12345678"));
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        // Dígitos arábico-índicos também são `\d` em Unicode
        assert!(!validate_zip_code("12345-67\u{0668}"));
        assert!(!validate_phone("(11) 98765-432\u{0661}"));
        assert!(!validate_phone("(11) 3333-444\u{0664}"));
    }

    #[test]
    fn instagram_format_rules() {
        assert_eq!(format_instagram(""), "");
        assert_eq!(format_instagram("abc"), "@abc");
        assert_eq!(format_instagram("@@abc!!"), "@abc");
        assert_eq!(format_instagram("@"), "");
        assert_eq!(format_instagram(&"a".repeat(40)), format!("@{}", "a".repeat(30)));
    }

    #[test]
    fn instagram_validation_rules() {
        assert!(validate_instagram(""));
        assert!(validate_instagram("@trampo.certo_"));
        assert!(validate_instagram("trampo"));
        assert!(!validate_instagram("@"));
        assert!(!validate_instagram("@trampo certo"));
        assert!(!validate_instagram(&format!("@{}", "a".repeat(31))));
    }

    #[test]
    fn state_is_upper_cased_and_truncated() {
        assert_eq!(format_state("sp"), "SP");
        assert_eq!(format_state("rjx"), "RJ");
    }
}
