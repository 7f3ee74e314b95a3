//! Integration tests feeding loaded tables into the simulation.

use mei_core::{NewRevenueEntry, Organizer, TaxRules};
use mei_data::{TaxTableLoader, TaxTableLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const IRPF_2025: &str = include_str!("../test-data/irpf_2025.csv");
const MULTI_YEAR: &str = include_str!("../test-data/multi_year.csv");

#[test]
fn test_shipped_table_matches_built_in_rules() {
    let records = TaxTableLoader::parse(IRPF_2025.as_bytes()).expect("Failed to parse CSV");

    let rules = TaxTableLoader::apply(TaxRules::default(), &records, 2025)
        .expect("Failed to apply table");

    assert_eq!(rules.brackets, TaxRules::default().brackets);
    assert!(TaxTableLoader::check_deductibles(&rules.brackets).is_empty());
}

#[test]
fn test_loaded_table_drives_the_organizer() {
    let records = TaxTableLoader::parse(IRPF_2025.as_bytes()).expect("Failed to parse CSV");
    let rules = TaxTableLoader::apply(TaxRules::default(), &records, 2025).unwrap();
    let mut organizer = Organizer::new(rules).expect("rules are valid");

    organizer
        .add_revenue(NewRevenueEntry {
            source: "Cliente".to_string(),
            amount: dec!(30000),
            date: chrono_date(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(organizer.simulation().tax_due, dec!(365.79));
}

#[test]
fn test_multi_year_file_lists_years() {
    let records = TaxTableLoader::parse(MULTI_YEAR.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(TaxTableLoader::tax_years(&records), vec![2024, 2025]);
}

#[test]
fn test_apply_selects_requested_year() {
    let records = TaxTableLoader::parse(MULTI_YEAR.as_bytes()).expect("Failed to parse CSV");

    let rules = TaxTableLoader::apply(TaxRules::default(), &records, 2024).unwrap();

    assert_eq!(rules.tax_year, 2024);
    assert_eq!(rules.brackets.len(), 5);
}

#[test]
fn test_missing_year_is_reported() {
    let records = TaxTableLoader::parse(IRPF_2025.as_bytes()).expect("Failed to parse CSV");

    let result = TaxTableLoader::apply(TaxRules::default(), &records, 2030);

    assert!(matches!(result, Err(TaxTableLoaderError::TaxYearNotFound(2030))));
}

fn chrono_date() -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::from_ymd_opt(2025, 1, 15)
}
