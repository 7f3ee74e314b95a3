//! Deduction buckets.
//!
//! | Bucket                | Rule |
//! |-----------------------|------|
//! | Dependents            | count × per-dependent allowance |
//! | Health                | sum of all health costs, uncapped |
//! | Education             | min(sum, per-person cap × max(1, university dependents + 1)) |
//! | Pension and donations | sum, uncapped (the private-pension ceiling is a validation check only) |
//! | Home office           | annual home costs × min(office / total area, home-office cap) |

use rust_decimal::Decimal;

use super::common::{clamp_non_negative, round_half_up};
use crate::models::{
    DeductionInputs, Deductions, EducationExpenses, HealthExpenses, HomeOffice,
    PensionContributions, TaxRules,
};

const MONTHS_PER_YEAR: u32 = 12;

/// Builds [`Deductions`] from raw inputs. Holds no state besides the rules.
#[derive(Debug, Clone)]
pub struct DeductionCalculator<'a> {
    rules: &'a TaxRules,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(rules: &'a TaxRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        inputs: &DeductionInputs,
    ) -> Deductions {
        let dependents = self.dependents(inputs.dependents);
        let health = self.health(&inputs.health);
        let (education_uncapped, education) =
            self.education(&inputs.education, inputs.university_dependents);
        let pension_and_donations = self.pension_and_donations(&inputs.pension);
        let (home_office_fraction, home_office) = self.home_office(&inputs.home_office);

        Deductions {
            inputs: inputs.clone(),
            dependents,
            health,
            education_uncapped,
            education,
            pension_and_donations,
            home_office_fraction,
            home_office,
            total: round_half_up(
                dependents + health + education + pension_and_donations + home_office,
            ),
        }
    }

    /// Allowance for `count` dependents.
    pub fn dependents(
        &self,
        count: u32,
    ) -> Decimal {
        round_half_up(Decimal::from(count) * self.rules.dependent_allowance)
    }

    fn health(
        &self,
        health: &HealthExpenses,
    ) -> Decimal {
        round_half_up(
            clamp_non_negative("health.medical", health.medical)
                + clamp_non_negative("health.medication", health.medication)
                + clamp_non_negative("health.health_plan", health.health_plan)
                + clamp_non_negative("health.prosthetics", health.prosthetics),
        )
    }

    /// Returns the raw sum and the capped amount.
    fn education(
        &self,
        education: &EducationExpenses,
        university_dependents: u32,
    ) -> (Decimal, Decimal) {
        let raw = round_half_up(
            clamp_non_negative("education.tuition", education.tuition)
                + clamp_non_negative("education.school", education.school)
                + clamp_non_negative("education.courses", education.courses)
                + clamp_non_negative("education.materials", education.materials),
        );
        let people = Decimal::from(university_dependents.saturating_add(1).max(1));
        let cap = round_half_up(self.rules.education_cap_per_person * people);

        (raw, raw.min(cap))
    }

    fn pension_and_donations(
        &self,
        pension: &PensionContributions,
    ) -> Decimal {
        round_half_up(
            clamp_non_negative("pension.official", pension.official)
                + clamp_non_negative("pension.private", pension.private)
                + clamp_non_negative("pension.donations", pension.donations)
                + clamp_non_negative("pension.alimony", pension.alimony),
        )
    }

    /// Returns the capped office fraction and the deduction.
    fn home_office(
        &self,
        home: &HomeOffice,
    ) -> (Decimal, Decimal) {
        let total_area = clamp_non_negative("home_office.total_area", home.total_area);
        let office_area = clamp_non_negative("home_office.office_area", home.office_area);
        if total_area.is_zero() || office_area.is_zero() {
            return (Decimal::ZERO, Decimal::ZERO);
        }

        let fraction = (office_area / total_area).min(self.rules.home_office_cap);
        let monthly = clamp_non_negative("home_office.monthly_rent", home.monthly_rent)
            + clamp_non_negative("home_office.monthly_condo_fee", home.monthly_condo_fee)
            + clamp_non_negative("home_office.monthly_utilities", home.monthly_utilities)
            + clamp_non_negative("home_office.monthly_internet", home.monthly_internet);
        let annual = monthly * Decimal::from(MONTHS_PER_YEAR)
            + clamp_non_negative("home_office.annual_property_tax", home.annual_property_tax);

        (fraction, round_half_up(annual * fraction))
    }
}
