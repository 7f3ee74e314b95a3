//! End-to-end tests over the on-disk fixtures: CSV import, profile loading,
//! the rendered report and a persistence round trip through each backend.

use std::path::{Path, PathBuf};

use mei_cli::app::{self, ImportCounts};
use mei_cli::config::ProfileFile;
use mei_cli::csv_loader;
use mei_cli::report::Report;
use mei_core::calculations::{CheckKind, Severity};
use mei_core::store::StoreConfig;
use mei_core::{AssetUse, Organizer, TaxRules};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn loaded_organizer() -> Organizer {
    let mut organizer = Organizer::new(TaxRules::default()).unwrap();
    ProfileFile::from_file(&fixture("profile.toml"))
        .unwrap()
        .apply_to(&mut organizer);
    app::import_entries(
        &mut organizer,
        Some(&fixture("revenues.csv")),
        Some(&fixture("expenses.csv")),
        Some(&fixture("assets.csv")),
    )
    .unwrap();
    organizer
}

#[test]
fn test_load_fixture_files() {
    let revenues = csv_loader::revenues_from_file(&fixture("revenues.csv")).unwrap();
    let expenses = csv_loader::expenses_from_file(&fixture("expenses.csv")).unwrap();
    let assets = csv_loader::assets_from_file(&fixture("assets.csv")).unwrap();

    assert_eq!(revenues.len(), 3);
    assert_eq!(expenses.len(), 3);
    assert_eq!(assets.len(), 3);
    assert_eq!(expenses[0].depreciation_life_years, 5);
    assert_eq!(assets[2].asset_use, Some(AssetUse::Personal));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = csv_loader::revenues_from_file(&fixture("nope.csv"));

    assert!(matches!(result, Err(csv_loader::CsvLoadError::Io { .. })));
}

#[test]
fn test_import_counts() {
    let mut organizer = Organizer::new(TaxRules::default()).unwrap();

    let counts = app::import_entries(
        &mut organizer,
        Some(&fixture("revenues.csv")),
        Some(&fixture("expenses.csv")),
        None,
    )
    .unwrap();

    assert_eq!(
        counts,
        ImportCounts {
            revenues: 3,
            expenses: 3,
            assets: 0
        }
    );
}

#[test]
fn test_pipeline_over_fixtures() {
    let organizer = loaded_organizer();
    let output = organizer.output();

    // 30,000 revenue - 7,100 expenses
    assert_eq!(output.revenue_total, dec!(30000.00));
    assert_eq!(output.expense_total, dec!(7100.00));
    assert_eq!(output.mei_profit, dec!(22900.00));
    // 1,000 × 13 months of salary
    assert_eq!(output.other_income.total, dec!(13000.00));

    let sim = organizer.simulation();
    assert_eq!(sim.gross_income, dec!(35900.00));
    // dependent 2,275.08 + medical 800
    assert_eq!(sim.total_deductions, dec!(3075.08));
    assert_eq!(sim.taxable_base, dec!(32824.92));
}

#[test]
fn test_checks_over_fixtures() {
    let organizer = loaded_organizer();
    let report = organizer.validations();

    assert_eq!(report.progress, 100);
    assert_eq!(
        report.check(CheckKind::Documents).map(|c| c.severity),
        Some(Severity::Success)
    );
    assert_eq!(
        report.check(CheckKind::RevenueLimit).map(|c| c.severity),
        Some(Severity::Success)
    );
}

#[test]
fn test_full_report_renders_fixture_values() {
    let organizer = loaded_organizer();

    let text = Report::full(&organizer).to_string();

    assert!(text.contains("Maria Souza"));
    assert!(text.contains("R$ 30.000,00"));
    assert!(text.contains("Comércio"));
    assert!(text.contains("Verificações (preenchimento 100%)"));
}

#[tokio::test]
async fn test_round_trip_through_every_backend() {
    let dir = tempfile::tempdir().unwrap();
    let registry = app::build_registry();
    let organizer = loaded_organizer();

    for (backend, location) in [
        ("memory", String::new()),
        ("json-file", dir.path().join("state.json").display().to_string()),
        ("sqlite", dir.path().join("state.db").display().to_string()),
    ] {
        let repo = registry
            .create(&StoreConfig {
                backend: backend.to_string(),
                location,
            })
            .await
            .unwrap();

        app::save(&organizer, &*repo).await.unwrap();
        let restored = Organizer::restore(TaxRules::default(), &*repo).await.unwrap();

        assert_eq!(restored.state(), organizer.state(), "backend {backend}");
        assert_eq!(restored.simulation(), organizer.simulation());
    }
}
