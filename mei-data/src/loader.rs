use std::io::Read;

use mei_core::calculations::bracket_engine::expected_deductibles;
use mei_core::{TaxBracket, TaxRules, TaxRulesError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Allowed gap between a published deductible and the one implied by the
/// bounds and rates.
const DEDUCTIBLE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("No brackets for tax year {0}")]
    TaxYearNotFound(i32),

    #[error("Invalid bracket table: {0}")]
    InvalidTable(#[from] TaxRulesError),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the bracket CSV.
///
/// - `tax_year`: the calendar year the table applies to
/// - `upper_bound`: inclusive ceiling; empty for the top bracket
/// - `rate`: marginal rate as a decimal (e.g. 0.075 for 7.5%)
/// - `deductible`: cumulative amount for the one-step formula
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxTableRecord {
    pub tax_year: i32,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub deductible: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A bracket whose published deductible disagrees with its bounds and rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductibleMismatch {
    pub index: usize,
    pub published: Decimal,
    pub expected: Decimal,
}

/// Loader for progressive bracket tables stored as CSV.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse records from any reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxTableRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxTableRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "bracket records parsed");
        Ok(records)
    }

    /// Years present in the records, ascending and de-duplicated.
    pub fn tax_years(records: &[TaxTableRecord]) -> Vec<i32> {
        let mut years: Vec<i32> = records.iter().map(|r| r.tax_year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Brackets for one year, in file order.
    pub fn brackets_for_year(
        records: &[TaxTableRecord],
        tax_year: i32,
    ) -> Result<Vec<TaxBracket>, TaxTableLoaderError> {
        let brackets: Vec<TaxBracket> = records
            .iter()
            .filter(|r| r.tax_year == tax_year)
            .map(|r| TaxBracket {
                upper_bound: r.upper_bound,
                rate: r.rate,
                deductible: r.deductible,
            })
            .collect();

        if brackets.is_empty() {
            return Err(TaxTableLoaderError::TaxYearNotFound(tax_year));
        }
        Ok(brackets)
    }

    /// Replaces the year and bracket table of `base`, then validates the
    /// result.
    pub fn apply(
        base: TaxRules,
        records: &[TaxTableRecord],
        tax_year: i32,
    ) -> Result<TaxRules, TaxTableLoaderError> {
        let rules = TaxRules {
            tax_year,
            brackets: Self::brackets_for_year(records, tax_year)?,
            ..base
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Compares each published deductible with the value implied by the
    /// table's bounds and rates.
    pub fn check_deductibles(brackets: &[TaxBracket]) -> Vec<DeductibleMismatch> {
        brackets
            .iter()
            .zip(expected_deductibles(brackets))
            .enumerate()
            .filter(|(_, (bracket, expected))| {
                (bracket.deductible - expected).abs() > DEDUCTIBLE_TOLERANCE
            })
            .map(|(index, (bracket, expected))| DeductibleMismatch {
                index,
                published: bracket.deductible,
                expected,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"tax_year,upper_bound,rate,deductible
2025,22847.76,0,0
2025,33919.80,0.075,1713.58
2025,45012.60,0.15,4257.57
2025,55976.16,0.225,7633.51
2025,,0.275,10432.32
"#;

    #[test]
    fn test_parse_csv_single_record() {
        let csv = "tax_year,upper_bound,rate,deductible\n2025,22847.76,0,0";

        let records = TaxTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![TaxTableRecord {
                tax_year: 2025,
                upper_bound: Some(dec!(22847.76)),
                rate: dec!(0),
                deductible: dec!(0),
            }]
        );
    }

    #[test]
    fn test_parse_csv_unbounded_top_bracket() {
        let records = TaxTableLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 5);
        assert_eq!(records[4].upper_bound, None);
        assert_eq!(records[4].rate, dec!(0.275));
    }

    #[test]
    fn test_parse_csv_trims_whitespace() {
        let csv = "tax_year,upper_bound,rate,deductible\n2025, 1000 , 0.1 , 5";

        let records = TaxTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, Some(dec!(1000)));
    }

    #[test]
    fn test_parse_csv_rejects_bad_rate() {
        let csv = "tax_year,upper_bound,rate,deductible\n2025,1000,ten,0";

        assert!(matches!(
            TaxTableLoader::parse(csv.as_bytes()),
            Err(TaxTableLoaderError::CsvParse(_))
        ));
    }

    #[test]
    fn test_apply_matches_default_rules() {
        let records = TaxTableLoader::parse(TEST_CSV.as_bytes()).unwrap();

        let rules = TaxTableLoader::apply(TaxRules::default(), &records, 2025).unwrap();

        assert_eq!(rules, TaxRules::default());
    }

    #[test]
    fn test_apply_unknown_year() {
        let records = TaxTableLoader::parse(TEST_CSV.as_bytes()).unwrap();

        assert!(matches!(
            TaxTableLoader::apply(TaxRules::default(), &records, 2019),
            Err(TaxTableLoaderError::TaxYearNotFound(2019))
        ));
    }

    #[test]
    fn test_apply_rejects_bounded_top_bracket() {
        let csv = "tax_year,upper_bound,rate,deductible\n2025,1000,0,0\n2025,2000,0.1,100";
        let records = TaxTableLoader::parse(csv.as_bytes()).unwrap();

        assert!(matches!(
            TaxTableLoader::apply(TaxRules::default(), &records, 2025),
            Err(TaxTableLoaderError::InvalidTable(TaxRulesError::TopBracketBounded))
        ));
    }

    #[test]
    fn test_published_deductibles_are_consistent() {
        let records = TaxTableLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let brackets = TaxTableLoader::brackets_for_year(&records, 2025).unwrap();

        assert!(TaxTableLoader::check_deductibles(&brackets).is_empty());
    }

    #[test]
    fn test_wrong_deductible_is_reported() {
        let csv = TEST_CSV.replace("4257.57", "4300.00");
        let records = TaxTableLoader::parse(csv.as_bytes()).unwrap();
        let brackets = TaxTableLoader::brackets_for_year(&records, 2025).unwrap();

        assert_eq!(
            TaxTableLoader::check_deductibles(&brackets),
            vec![DeductibleMismatch {
                index: 2,
                published: dec!(4300.00),
                expected: dec!(4257.57),
            }]
        );
    }
}
