//! Wiring shared by the binary and the integration tests.

use std::path::Path;

use anyhow::{Context, Result};
use mei_core::store::RepositoryRegistry;
use mei_core::{Organizer, StateRepository, TaxRules};
use mei_data::TaxTableLoader;
use mei_store_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info, warn};

use crate::config::RulesOverrides;
use crate::csv_loader;

/// Registry with every backend this binary ships: `memory`, `json-file`
/// and `sqlite`.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::with_builtin_backends();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Builds the rules in force: defaults, then TOML overrides, then a bracket
/// table from CSV. `year` selects the table year and defaults to the rules'
/// own year.
pub fn load_rules(
    config: Option<&Path>,
    brackets: Option<&Path>,
    year: Option<i32>,
) -> Result<TaxRules> {
    let mut rules = TaxRules::default();

    if let Some(path) = config {
        rules = RulesOverrides::from_file(path)?.apply(rules);
        debug!(path = %path.display(), "rule overrides loaded");
    }

    if let Some(path) = brackets {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open bracket table '{}'", path.display()))?;
        let records = TaxTableLoader::parse(file)?;
        let tax_year = year.unwrap_or(rules.tax_year);
        rules = TaxTableLoader::apply(rules, &records, tax_year)
            .with_context(|| format!("bracket table '{}'", path.display()))?;
        for mismatch in TaxTableLoader::check_deductibles(&rules.brackets) {
            warn!(
                bracket = mismatch.index,
                published = %mismatch.published,
                expected = %mismatch.expected,
                "published deductible disagrees with the table"
            );
        }
        debug!(tax_year, "bracket table loaded");
    } else if let Some(tax_year) = year {
        rules.tax_year = tax_year;
    }

    rules.validate().context("invalid tax rules")?;
    Ok(rules)
}

/// Counts of entries added by [`import_entries`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportCounts {
    pub revenues: usize,
    pub expenses: usize,
    pub assets: usize,
}

/// Loads every given CSV file and adds its rows to the organizer.
///
/// Files are parsed before anything is added, so a malformed file leaves
/// the ledger untouched. A row the ledger rejects stops the import at that
/// row; earlier rows stay added.
pub fn import_entries(
    organizer: &mut Organizer,
    revenues: Option<&Path>,
    expenses: Option<&Path>,
    assets: Option<&Path>,
) -> Result<ImportCounts> {
    let revenues = revenues
        .map(csv_loader::revenues_from_file)
        .transpose()?
        .unwrap_or_default();
    let expenses = expenses
        .map(csv_loader::expenses_from_file)
        .transpose()?
        .unwrap_or_default();
    let assets = assets
        .map(csv_loader::assets_from_file)
        .transpose()?
        .unwrap_or_default();

    let mut counts = ImportCounts::default();
    for (idx, entry) in revenues.into_iter().enumerate() {
        organizer
            .add_revenue(entry)
            .with_context(|| format!("revenue row {}", idx + 1))?;
        counts.revenues += 1;
    }
    for (idx, entry) in expenses.into_iter().enumerate() {
        organizer
            .add_expense(entry)
            .with_context(|| format!("expense row {}", idx + 1))?;
        counts.expenses += 1;
    }
    for (idx, entry) in assets.into_iter().enumerate() {
        organizer
            .add_asset(entry)
            .with_context(|| format!("asset row {}", idx + 1))?;
        counts.assets += 1;
    }

    info!(
        revenues = counts.revenues,
        expenses = counts.expenses,
        assets = counts.assets,
        "entries imported"
    );
    Ok(counts)
}

/// Saves the organizer, turning a logged persistence failure into an error
/// for the command line.
pub async fn save(organizer: &Organizer, repo: &dyn StateRepository) -> Result<()> {
    if organizer.persist(repo).await {
        Ok(())
    } else {
        anyhow::bail!("failed to save state; see the log for details")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn registry_lists_all_backends() {
        assert_eq!(
            build_registry().available_backends(),
            vec!["json-file", "memory", "sqlite"]
        );
    }

    #[test]
    fn load_rules_without_inputs_is_default() {
        assert_eq!(load_rules(None, None, None).unwrap(), TaxRules::default());
    }

    #[test]
    fn load_rules_applies_toml_then_year() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mei_revenue_ceiling = \"100000\"").unwrap();

        let rules = load_rules(Some(file.path()), None, Some(2026)).unwrap();

        assert_eq!(rules.mei_revenue_ceiling, dec!(100000));
        assert_eq!(rules.tax_year, 2026);
    }

    #[test]
    fn load_rules_rejects_invalid_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "home_office_cap = \"1.5\"").unwrap();

        assert!(load_rules(Some(file.path()), None, None).is_err());
    }

    #[test]
    fn load_rules_reads_bracket_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "tax_year,upper_bound,rate,deductible\n2030,10000,0,0\n2030,,0.1,1000\n"
        )
        .unwrap();

        let rules = load_rules(None, Some(file.path()), Some(2030)).unwrap();

        assert_eq!(rules.tax_year, 2030);
        assert_eq!(rules.brackets.len(), 2);
    }

    #[test]
    fn import_stops_at_rejected_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "source,amount,date\nA,100,2025-01-01\nB,-5,2025-01-02\nC,50,2025-01-03\n"
        )
        .unwrap();
        let mut organizer = Organizer::new(TaxRules::default()).unwrap();

        let err = import_entries(&mut organizer, Some(file.path()), None, None).unwrap_err();

        assert!(err.to_string().contains("revenue row 2"));
        assert_eq!(organizer.state().ledger.revenues().len(), 1);
    }
}
