//! CPF and CNPJ check-digit validation.
//!
//! The core only needs a yes/no per document, so validation sits behind
//! [`DocumentValidator`]. [`BrazilianDocuments`] implements the federal
//! check-digit rules.

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;
const CNPJ_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
        }
    }
}

pub trait DocumentValidator: Send + Sync {
    /// `digits` has already been cleaned of punctuation.
    fn is_valid(&self, kind: DocumentKind, digits: &str) -> bool;
}

/// Strips everything but ASCII digits: `"529.982.247-25"` → `"52998224725"`.
pub fn clean_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrazilianDocuments;

impl DocumentValidator for BrazilianDocuments {
    fn is_valid(&self, kind: DocumentKind, digits: &str) -> bool {
        let Some(digits) = to_digits(digits) else {
            return false;
        };
        match kind {
            DocumentKind::Cpf => cpf_is_valid(&digits),
            DocumentKind::Cnpj => cnpj_is_valid(&digits),
        }
    }
}

fn to_digits(s: &str) -> Option<Vec<u32>> {
    s.chars().map(|c| c.to_digit(10)).collect()
}

/// Repeated-digit sequences pass the arithmetic but are never issued.
fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn cpf_is_valid(digits: &[u32]) -> bool {
    if digits.len() != CPF_LEN || all_same(digits) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = digits[..len]
            .iter()
            .zip((2..=len as u32 + 1).rev())
            .map(|(d, w)| d * w)
            .sum();
        match sum * 10 % 11 {
            10 => 0,
            r => r,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

fn cnpj_is_valid(digits: &[u32]) -> bool {
    if digits.len() != CNPJ_LEN || all_same(digits) {
        return false;
    }

    let check = |len: usize| {
        let weights = &CNPJ_WEIGHTS[CNPJ_WEIGHTS.len() - len..];
        let sum: u32 = digits[..len].iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };

    check(12) == digits[12] && check(13) == digits[13]
}
