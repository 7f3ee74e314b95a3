//! TOML inputs: rule overrides and profile files.

use std::path::Path;

use mei_core::{
    Activity, AddressBook, DeductionInputs, DepreciationRate, Identification, Organizer,
    OtherIncomeInputs, TaxBracket, TaxRules,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in '{path}': {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Toml {
        path: path.display().to_string(),
        source,
    })
}

/// Partial [`TaxRules`]. Absent keys keep the base value.
///
/// ```toml
/// tax_year = 2026
/// mei_revenue_ceiling = "81000.00"
/// mixed_use_half_weight = true
///
/// [[brackets]]
/// upper_bound = "22847.76"
/// rate = "0"
/// deductible = "0"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesOverrides {
    pub tax_year: Option<i32>,
    pub brackets: Option<Vec<TaxBracket>>,
    pub standard_deduction: Option<Decimal>,
    pub exemption_threshold: Option<Decimal>,
    pub dependent_allowance: Option<Decimal>,
    pub education_cap_per_person: Option<Decimal>,
    pub home_office_cap: Option<Decimal>,
    pub private_pension_cap_ratio: Option<Decimal>,
    pub mei_revenue_ceiling: Option<Decimal>,
    pub near_limit_ratio: Option<Decimal>,
    pub default_salary_months: Option<u32>,
    pub default_rental_months: Option<u32>,
    pub depreciation_rates: Option<Vec<DepreciationRate>>,
    pub mixed_use_half_weight: Option<bool>,
}

impl RulesOverrides {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    /// Layers the overrides over `base`. The result is not validated here.
    pub fn apply(self, base: TaxRules) -> TaxRules {
        TaxRules {
            tax_year: self.tax_year.unwrap_or(base.tax_year),
            brackets: self.brackets.unwrap_or(base.brackets),
            standard_deduction: self.standard_deduction.unwrap_or(base.standard_deduction),
            exemption_threshold: self.exemption_threshold.unwrap_or(base.exemption_threshold),
            dependent_allowance: self.dependent_allowance.unwrap_or(base.dependent_allowance),
            education_cap_per_person: self
                .education_cap_per_person
                .unwrap_or(base.education_cap_per_person),
            home_office_cap: self.home_office_cap.unwrap_or(base.home_office_cap),
            private_pension_cap_ratio: self
                .private_pension_cap_ratio
                .unwrap_or(base.private_pension_cap_ratio),
            mei_revenue_ceiling: self.mei_revenue_ceiling.unwrap_or(base.mei_revenue_ceiling),
            near_limit_ratio: self.near_limit_ratio.unwrap_or(base.near_limit_ratio),
            default_salary_months: self
                .default_salary_months
                .unwrap_or(base.default_salary_months),
            default_rental_months: self
                .default_rental_months
                .unwrap_or(base.default_rental_months),
            depreciation_rates: self.depreciation_rates.unwrap_or(base.depreciation_rates),
            mixed_use_half_weight: self
                .mixed_use_half_weight
                .unwrap_or(base.mixed_use_half_weight),
        }
    }
}

/// Profile sections to load into the organizer. Each present table replaces
/// the whole section; absent tables are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileFile {
    pub identification: Option<Identification>,
    pub address: Option<AddressBook>,
    pub activity: Option<Activity>,
    pub other_income: Option<OtherIncomeInputs>,
    pub deductions: Option<DeductionInputs>,
}

impl ProfileFile {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    /// Returns the names of the sections that were applied.
    pub fn apply_to(self, organizer: &mut Organizer) -> Vec<&'static str> {
        let mut applied = Vec::new();
        if let Some(identification) = self.identification {
            organizer.set_identification(identification);
            applied.push("identification");
        }
        if let Some(address) = self.address {
            organizer.set_address(address);
            applied.push("address");
        }
        if let Some(activity) = self.activity {
            organizer.set_activity(activity);
            applied.push("activity");
        }
        if let Some(other_income) = self.other_income {
            organizer.set_other_income(other_income);
            applied.push("other_income");
        }
        if let Some(deductions) = self.deductions {
            organizer.set_deductions(deductions);
            applied.push("deductions");
        }
        debug!(?applied, "profile applied");
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_overrides_keep_defaults() {
        let overrides = RulesOverrides::parse("").unwrap();

        assert_eq!(overrides.apply(TaxRules::default()), TaxRules::default());
    }

    #[test]
    fn scalar_overrides_replace_only_named_fields() {
        let text = r#"
tax_year = 2026
mei_revenue_ceiling = "130000"
mixed_use_half_weight = true
"#;
        let rules = RulesOverrides::parse(text)
            .unwrap()
            .apply(TaxRules::default());

        assert_eq!(rules.tax_year, 2026);
        assert_eq!(rules.mei_revenue_ceiling, dec!(130000));
        assert!(rules.mixed_use_half_weight);
        assert_eq!(rules.standard_deduction, dec!(2275.08));
        assert_eq!(rules.brackets, TaxRules::default().brackets);
    }

    #[test]
    fn bracket_table_override_omits_top_bound() {
        let text = r#"
[[brackets]]
upper_bound = "20000"
rate = "0"
deductible = "0"

[[brackets]]
rate = "0.1"
deductible = "2000"
"#;
        let rules = RulesOverrides::parse(text)
            .unwrap()
            .apply(TaxRules::default());

        assert_eq!(
            rules.brackets,
            vec![
                TaxBracket::bounded(dec!(20000), dec!(0), dec!(0)),
                TaxBracket::unbounded(dec!(0.1), dec!(2000)),
            ]
        );
        assert_eq!(rules.validate(), Ok(()));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(RulesOverrides::parse("teto = 1").is_err());
    }

    #[test]
    fn profile_applies_present_sections_only() {
        let text = r#"
[identification]
name = "Maria Souza"
cpf = "529.982.247-25"

[deductions]
dependents = 2

[deductions.health]
medical = "1500.00"
"#;
        let profile = ProfileFile::parse(text).unwrap();
        let mut organizer = Organizer::new(TaxRules::default()).unwrap();

        let applied = profile.apply_to(&mut organizer);

        assert_eq!(applied, vec!["identification", "deductions"]);
        let state = organizer.state();
        assert_eq!(state.identification.name, "Maria Souza");
        assert_eq!(state.deductions.dependents, 2);
        assert_eq!(state.deductions.health.medical, dec!(1500.00));
        assert!(state.address.same_address);
    }
}
