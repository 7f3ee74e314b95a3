//! CSV import of ledger entries.
//!
//! Headers are matched by name, so column order does not matter. Optional
//! cells may be left empty. Rows are only parsed here; field rules (positive
//! amount, required date, ...) are enforced when the entries are added to the
//! ledger. Unknown category or use codes are kept verbatim, as the models
//! do, and logged.
//!
//! ### Revenues
//!
//! | Column         | Required | Notes                                        |
//! |----------------|----------|----------------------------------------------|
//! | `source`       | yes      | client or origin label                       |
//! | `amount`       | yes      | decimal, e.g. `1250.40`                      |
//! | `date`         | yes      | `YYYY-MM-DD`                                 |
//! | `category`     | no       | `servico`, `comercio`, `misto`, `outro`      |
//! | `invoice_note` | no       |                                              |
//!
//! ### Expenses
//!
//! | Column                    | Required | Notes                                                       |
//! |---------------------------|----------|-------------------------------------------------------------|
//! | `description`             | yes      |                                                             |
//! | `amount`                  | yes      |                                                             |
//! | `date`                    | yes      |                                                             |
//! | `category`                | no       | `operacional`, `transporte`, `equipamento`, `impostos`, `outro` |
//! | `note`                    | no       |                                                             |
//! | `depreciation_life_years` | no       | `5`, `10`, `20` or `25`; empty for non-depreciable          |
//!
//! ### Assets
//!
//! | Column             | Required | Notes                                |
//! |--------------------|----------|--------------------------------------|
//! | `name`             | yes      |                                      |
//! | `amount`           | yes      |                                      |
//! | `acquisition_date` | yes      |                                      |
//! | `asset_use`        | yes      | `profissional`, `pessoal`, `misto`   |
//!
//! ```csv
//! source,amount,category,date,invoice_note
//! Padaria Central,1250.40,servico,2025-03-03,NF 101
//! ```

use std::path::Path;

use chrono::NaiveDate;
use mei_core::{
    AssetUse, ExpenseCategory, NewAssetEntry, NewExpenseEntry, NewRevenueEntry, RevenueCategory,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RevenueRow {
    source: String,
    amount: Decimal,
    category: Option<String>,
    date: Option<NaiveDate>,
    invoice_note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpenseRow {
    description: String,
    amount: Decimal,
    category: Option<String>,
    date: Option<NaiveDate>,
    note: Option<String>,
    depreciation_life_years: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AssetRow {
    name: String,
    amount: Decimal,
    acquisition_date: Option<NaiveDate>,
    asset_use: Option<String>,
}

/// Errors that can occur while loading CSV entries.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing required column, type mismatch, etc.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// Deserializes every row, pairing it with its 1-based row number.
fn read_rows<T: DeserializeOwned>(input: &str) -> Result<Vec<(usize, T)>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(idx, result)| Ok((idx + 1, result?)))
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn warn_unrecognized(column: &str, raw: &str, row: usize) {
    warn!(column, value = raw, row, "unrecognised code kept verbatim");
}

fn revenue_category(raw: Option<String>, row: usize) -> RevenueCategory {
    let Some(raw) = non_empty(raw) else {
        return RevenueCategory::default();
    };
    let category = RevenueCategory::from_code(&raw);
    if let RevenueCategory::Unrecognized(code) = &category {
        warn_unrecognized("category", code, row);
    }
    category
}

fn expense_category(raw: Option<String>, row: usize) -> ExpenseCategory {
    let Some(raw) = non_empty(raw) else {
        return ExpenseCategory::default();
    };
    let category = ExpenseCategory::from_code(&raw);
    if let ExpenseCategory::Unrecognized(code) = &category {
        warn_unrecognized("category", code, row);
    }
    category
}

/// An empty use is passed on as `None` so the ledger reports it as missing.
fn asset_use(raw: Option<String>, row: usize) -> Option<AssetUse> {
    let raw = non_empty(raw)?;
    let asset_use = AssetUse::from_code(&raw);
    if let AssetUse::Unrecognized(code) = &asset_use {
        warn_unrecognized("asset_use", code, row);
    }
    Some(asset_use)
}

pub fn revenues_from_str(input: &str) -> Result<Vec<NewRevenueEntry>, CsvLoadError> {
    Ok(read_rows::<RevenueRow>(input)?
        .into_iter()
        .map(|(row_number, row)| NewRevenueEntry {
            category: revenue_category(row.category, row_number),
            source: row.source,
            amount: row.amount,
            date: row.date,
            invoice_note: non_empty(row.invoice_note),
        })
        .collect())
}

pub fn expenses_from_str(input: &str) -> Result<Vec<NewExpenseEntry>, CsvLoadError> {
    Ok(read_rows::<ExpenseRow>(input)?
        .into_iter()
        .map(|(row_number, row)| NewExpenseEntry {
            category: expense_category(row.category, row_number),
            description: row.description,
            amount: row.amount,
            date: row.date,
            note: non_empty(row.note),
            depreciation_life_years: row.depreciation_life_years.unwrap_or(0),
        })
        .collect())
}

pub fn assets_from_str(input: &str) -> Result<Vec<NewAssetEntry>, CsvLoadError> {
    Ok(read_rows::<AssetRow>(input)?
        .into_iter()
        .map(|(row_number, row)| NewAssetEntry {
            asset_use: asset_use(row.asset_use, row_number),
            name: row.name,
            amount: row.amount,
            acquisition_date: row.acquisition_date,
        })
        .collect())
}

fn read_file(path: &Path) -> Result<String, CsvLoadError> {
    std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn revenues_from_file(path: &Path) -> Result<Vec<NewRevenueEntry>, CsvLoadError> {
    revenues_from_str(&read_file(path)?)
}

pub fn expenses_from_file(path: &Path) -> Result<Vec<NewExpenseEntry>, CsvLoadError> {
    expenses_from_str(&read_file(path)?)
}

pub fn assets_from_file(path: &Path) -> Result<Vec<NewAssetEntry>, CsvLoadError> {
    assets_from_str(&read_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const REVENUES_CSV: &str = "\
source,amount,category,date,invoice_note
Padaria Central,1250.40,servico,2025-03-03,NF 101
Feira,300,comercio,2025-04-12,
";

    const EXPENSES_CSV: &str = "\
description,amount,category,date,note,depreciation_life_years
Notebook,5000.00,equipamento,2025-01-10,,5
Combustível,180.50,transporte,2025-02-01,posto,
";

    const ASSETS_CSV: &str = "\
name,amount,acquisition_date,asset_use
Carro,40000,2024-06-01,misto
Impressora,1200,2025-01-15,profissional
";

    #[test]
    fn test_revenues_parse_in_file_order() {
        let entries = revenues_from_str(REVENUES_CSV).expect("should parse revenues");

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            NewRevenueEntry {
                source: "Padaria Central".to_string(),
                amount: dec!(1250.40),
                category: RevenueCategory::Service,
                date: NaiveDate::from_ymd_opt(2025, 3, 3),
                invoice_note: Some("NF 101".to_string()),
            }
        );
        assert_eq!(entries[1].category, RevenueCategory::Commerce);
        assert_eq!(entries[1].amount, dec!(300));
        assert!(entries[1].invoice_note.is_none());
    }

    #[test]
    fn test_missing_category_uses_default() {
        let csv = "source,amount,date\nCliente,10,2025-01-01\n";

        let entries = revenues_from_str(csv).unwrap();

        assert_eq!(entries[0].category, RevenueCategory::Service);
    }

    #[test]
    fn test_empty_date_is_passed_through_as_none() {
        let csv = "source,amount,date\nCliente,10,\n";

        let entries = revenues_from_str(csv).unwrap();

        assert_eq!(entries[0].date, None);
    }

    #[test]
    fn test_expenses_parse_depreciation_life() {
        let entries = expenses_from_str(EXPENSES_CSV).expect("should parse expenses");

        assert_eq!(entries[0].category, ExpenseCategory::Equipment);
        assert_eq!(entries[0].depreciation_life_years, 5);
        assert_eq!(entries[1].depreciation_life_years, 0);
        assert_eq!(entries[1].note.as_deref(), Some("posto"));
    }

    #[test]
    fn test_assets_parse_use() {
        let entries = assets_from_str(ASSETS_CSV).expect("should parse assets");

        assert_eq!(entries[0].asset_use, Some(AssetUse::Mixed));
        assert_eq!(entries[1].asset_use, Some(AssetUse::Professional));
    }

    #[test]
    fn test_unknown_category_is_kept_verbatim() {
        let csv = "\
source,amount,category,date
A,1,servico,2025-01-01
B,2,consultoria,2025-01-02
";
        let entries = revenues_from_str(csv).unwrap();

        assert_eq!(
            entries[1].category,
            RevenueCategory::Unrecognized("consultoria".to_string())
        );
    }

    #[test]
    fn test_unknown_asset_use_is_kept_and_empty_use_is_none() {
        let csv = "\
name,amount,acquisition_date,asset_use
Mesa,100,2025-01-01,alugado
Cadeira,50,2025-01-01,
";
        let entries = assets_from_str(csv).unwrap();

        assert_eq!(
            entries[0].asset_use,
            Some(AssetUse::Unrecognized("alugado".to_string()))
        );
        assert_eq!(entries[1].asset_use, None);
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "source,date\nCliente,2025-01-01\n";

        assert!(matches!(revenues_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_amount_returns_parse_error() {
        let csv = "source,amount,date\nCliente,muito,2025-01-01\n";

        assert!(matches!(revenues_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_header_only_yields_no_entries() {
        let entries = expenses_from_str("description,amount,date\n").unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn test_whitespace_and_shuffled_columns() {
        let csv = "\
date , amount , source
2025-05-05 , 99.90 , Loja
";
        let entries = revenues_from_str(csv).unwrap();

        assert_eq!(entries[0].source, "Loja");
        assert_eq!(entries[0].amount, dec!(99.90));
    }
}
