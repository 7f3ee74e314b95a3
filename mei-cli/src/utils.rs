use mei_core::EntryKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes user input for decimal parsing.
///
/// A comma marks the Brazilian format (`1.234,56`): dots are thousands
/// separators and the comma is the decimal point. Without a comma the input
/// is taken as-is (`1234.56`). An `R$` prefix and whitespace are dropped.
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim().trim_start_matches("R$").trim();
    if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    }
}

/// Parses a string into a [`Decimal`].
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// clap value parser for ledger collection names.
pub fn parse_entry_kind(s: &str) -> Result<EntryKind, String> {
    EntryKind::parse(&s.trim().to_lowercase())
        .ok_or_else(|| format!("unknown entry kind '{s}'; expected revenue, expense or asset"))
}
