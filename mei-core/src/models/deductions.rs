use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthExpenses {
    pub medical: Decimal,
    pub medication: Decimal,
    pub health_plan: Decimal,
    pub prosthetics: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationExpenses {
    pub tuition: Decimal,
    pub school: Decimal,
    pub courses: Decimal,
    pub materials: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PensionContributions {
    /// Official social security contribution (INSS).
    pub official: Decimal,
    /// Private pension (PGBL). Capped at 12% of the taxable base only when validating.
    pub private: Decimal,
    pub donations: Decimal,
    pub alimony: Decimal,
}

/// Home used as the business address.
///
/// Rent, condo fee, utilities and internet are monthly; property tax is annual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeOffice {
    pub total_area: Decimal,
    pub office_area: Decimal,
    pub monthly_rent: Decimal,
    pub monthly_condo_fee: Decimal,
    pub annual_property_tax: Decimal,
    pub monthly_utilities: Decimal,
    pub monthly_internet: Decimal,
}

/// Raw deduction inputs, one singleton per snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionInputs {
    pub dependents: u32,
    pub university_dependents: u32,
    pub health: HealthExpenses,
    pub education: EducationExpenses,
    pub pension: PensionContributions,
    pub home_office: HomeOffice,
}

/// Computed deduction buckets alongside the inputs they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    pub inputs: DeductionInputs,
    pub dependents: Decimal,
    pub health: Decimal,
    /// Education spending before the per-person ceiling.
    pub education_uncapped: Decimal,
    pub education: Decimal,
    pub pension_and_donations: Decimal,
    /// Share of the home attributed to the office, after the statutory cap.
    pub home_office_fraction: Decimal,
    pub home_office: Decimal,
    pub total: Decimal,
}
