//! Constant tables for one tax year.
//!
//! Every statutory figure the calculators use lives in [`TaxRules`], so a
//! different year (or a what-if on the law itself) is a different value of
//! this struct rather than a different code path.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxBracket;

/// Errors found while validating a [`TaxRules`] value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRulesError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// Bracket ceilings must increase strictly.
    #[error("bracket {index} upper bound {bound} does not exceed the previous bound")]
    BracketsNotAscending { index: usize, bound: Decimal },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast(usize),

    #[error("the last bracket must be unbounded")]
    TopBracketBounded,

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRatio { field: &'static str, value: Decimal },
}

/// Depreciation rate for one supported useful life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationRate {
    pub life_years: u32,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRules {
    pub tax_year: i32,

    /// Ordered bracket table; the last entry is unbounded.
    pub brackets: Vec<TaxBracket>,

    /// Fixed amount subtracted from the taxable base before the brackets apply.
    pub standard_deduction: Decimal,

    /// A return is required when the taxable base exceeds this amount.
    pub exemption_threshold: Decimal,

    /// Annual deduction per dependent.
    pub dependent_allowance: Decimal,

    /// Annual education ceiling per person (taxpayer plus university dependents).
    pub education_cap_per_person: Decimal,

    /// Maximum share of the home that may be attributed to the office.
    pub home_office_cap: Decimal,

    /// Private pension ceiling as a share of the taxable base. Checked by the
    /// validation projector only.
    pub private_pension_cap_ratio: Decimal,

    /// Annual gross revenue ceiling for the MEI regime.
    pub mei_revenue_ceiling: Decimal,

    /// Share of the ceiling from which revenue is reported as near the limit.
    pub near_limit_ratio: Decimal,

    pub default_salary_months: u32,
    pub default_rental_months: u32,

    /// Supported useful lives; any other life depreciates at zero.
    pub depreciation_rates: Vec<DepreciationRate>,

    /// Count mixed-use assets as half professional, half personal.
    pub mixed_use_half_weight: bool,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            tax_year: 2025,
            brackets: vec![
                TaxBracket::bounded(Decimal::new(2_284_776, 2), Decimal::ZERO, Decimal::ZERO),
                TaxBracket::bounded(
                    Decimal::new(3_391_980, 2),
                    Decimal::new(75, 3),
                    Decimal::new(171_358, 2),
                ),
                TaxBracket::bounded(
                    Decimal::new(4_501_260, 2),
                    Decimal::new(15, 2),
                    Decimal::new(425_757, 2),
                ),
                TaxBracket::bounded(
                    Decimal::new(5_597_616, 2),
                    Decimal::new(225, 3),
                    Decimal::new(763_351, 2),
                ),
                TaxBracket::unbounded(Decimal::new(275, 3), Decimal::new(1_043_232, 2)),
            ],
            standard_deduction: Decimal::new(227_508, 2),
            exemption_threshold: Decimal::new(2_855_970, 2),
            dependent_allowance: Decimal::new(227_508, 2),
            education_cap_per_person: Decimal::new(356_150, 2),
            home_office_cap: Decimal::new(15, 2),
            private_pension_cap_ratio: Decimal::new(12, 2),
            mei_revenue_ceiling: Decimal::new(81_000, 0),
            near_limit_ratio: Decimal::new(90, 2),
            default_salary_months: 13,
            default_rental_months: 12,
            depreciation_rates: vec![
                DepreciationRate {
                    life_years: 5,
                    rate: Decimal::new(20, 2),
                },
                DepreciationRate {
                    life_years: 10,
                    rate: Decimal::new(10, 2),
                },
                DepreciationRate {
                    life_years: 20,
                    rate: Decimal::new(5, 2),
                },
                DepreciationRate {
                    life_years: 25,
                    rate: Decimal::new(4, 2),
                },
            ],
            mixed_use_half_weight: false,
        }
    }
}

impl TaxRules {
    /// Rate for a useful life, or `None` when the life is not in the table.
    pub fn depreciation_rate(&self, life_years: u32) -> Option<Decimal> {
        self.depreciation_rates
            .iter()
            .find(|entry| entry.life_years == life_years)
            .map(|entry| entry.rate)
    }

    /// Validates the bracket table and every constant.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxRulesError`] found, checking brackets first.
    pub fn validate(&self) -> Result<(), TaxRulesError> {
        self.validate_brackets()?;

        for (field, value) in [
            ("standard_deduction", self.standard_deduction),
            ("exemption_threshold", self.exemption_threshold),
            ("dependent_allowance", self.dependent_allowance),
            ("education_cap_per_person", self.education_cap_per_person),
            ("mei_revenue_ceiling", self.mei_revenue_ceiling),
        ] {
            if value < Decimal::ZERO {
                return Err(TaxRulesError::NegativeAmount { field, value });
            }
        }

        for (field, value) in [
            ("home_office_cap", self.home_office_cap),
            ("private_pension_cap_ratio", self.private_pension_cap_ratio),
            ("near_limit_ratio", self.near_limit_ratio),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(TaxRulesError::InvalidRatio { field, value });
            }
        }

        for entry in &self.depreciation_rates {
            if entry.rate < Decimal::ZERO || entry.rate > Decimal::ONE {
                return Err(TaxRulesError::InvalidRatio {
                    field: "depreciation_rates",
                    value: entry.rate,
                });
            }
        }

        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), TaxRulesError> {
        let last = self
            .brackets
            .len()
            .checked_sub(1)
            .ok_or(TaxRulesError::NoTaxBrackets)?;

        let mut previous = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TaxRulesError::InvalidBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.deductible < Decimal::ZERO {
                return Err(TaxRulesError::NegativeAmount {
                    field: "bracket deductible",
                    value: bracket.deductible,
                });
            }
            match (bracket.upper_bound, index == last) {
                (Some(_), true) => return Err(TaxRulesError::TopBracketBounded),
                (None, false) => return Err(TaxRulesError::UnboundedBracketNotLast(index)),
                (None, true) => {}
                (Some(bound), false) => {
                    if bound < Decimal::ZERO || (index > 0 && bound <= previous) {
                        return Err(TaxRulesError::BracketsNotAscending { index, bound });
                    }
                    previous = bound;
                }
            }
        }

        Ok(())
    }
}
