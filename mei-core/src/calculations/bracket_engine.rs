//! Progressive bracket engine.
//!
//! Turns gross income and total deductions into a [`SimulationResult`]:
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Taxable base = max(0, gross income − deductions) |
//! | 2    | Adjusted base = max(0, taxable base − standard deduction) |
//! | 3    | Walk every bracket, slicing the adjusted base at each inclusive ceiling |
//! | 4    | Tax due = sum of the per-bracket taxes |
//! | 5    | Filing required when the taxable base (step 1) exceeds the exemption threshold |
//! | 6    | Status: not taxable / exempt (required, no tax) / taxable |
//! | 7    | Effective rate = tax due ÷ gross income × 100, zero when gross is zero |
//!
//! Every bracket appears in the breakdown, including those with no income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use mei_core::calculations::BracketEngine;
//! use mei_core::{FilingStatus, TaxRules};
//!
//! let rules = TaxRules::default();
//! let result = BracketEngine::new(&rules).calculate(dec!(30000), dec!(0));
//!
//! assert_eq!(result.adjusted_base, dec!(27724.92));
//! assert_eq!(result.tax_due, dec!(365.79));
//! assert_eq!(result.filing_status, FilingStatus::Taxable);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::common::{clamp_non_negative, max, percent_of, round_half_up};
use crate::models::{BracketSlice, FilingStatus, SimulationResult, TaxBracket, TaxRules};

/// Calculator over one validated [`TaxRules`] table.
///
/// Infallible: the rules are validated before an engine is ever built from
/// them by the organizer, so there is always an unbounded top bracket.
#[derive(Debug, Clone)]
pub struct BracketEngine<'a> {
    rules: &'a TaxRules,
}

impl<'a> BracketEngine<'a> {
    pub fn new(rules: &'a TaxRules) -> Self {
        Self { rules }
    }

    /// Runs the full algorithm. Deterministic; identical inputs give an
    /// identical result.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> SimulationResult {
        let gross_income = round_half_up(clamp_non_negative("gross_income", gross_income));
        let total_deductions =
            round_half_up(clamp_non_negative("total_deductions", total_deductions));

        let taxable_base = self.taxable_base(gross_income, total_deductions);
        let adjusted_base = self.adjusted_base(taxable_base);
        let brackets = self.slice(adjusted_base);
        let tax_due: Decimal = brackets.iter().map(|slice| slice.tax_in_bracket).sum();

        let filing_required = taxable_base > self.rules.exemption_threshold;
        let filing_status = self.filing_status(filing_required, tax_due);

        debug!(
            %gross_income,
            %total_deductions,
            %taxable_base,
            %tax_due,
            status = filing_status.as_str(),
            "simulation computed"
        );

        SimulationResult {
            gross_income,
            total_deductions,
            taxable_base,
            adjusted_base,
            tax_due,
            brackets,
            effective_rate: percent_of(tax_due, gross_income),
            filing_status,
            filing_required,
        }
    }

    /// One-step tax for an adjusted base: `base × rate − deductible` using the
    /// bracket the base falls into. Agrees with the per-bracket walk to
    /// within rounding when the table's deductibles are consistent.
    pub fn formula_tax(
        &self,
        adjusted_base: Decimal,
    ) -> Decimal {
        self.rules
            .brackets
            .iter()
            .find(|bracket| bracket.contains(adjusted_base))
            .map(|bracket| {
                max(
                    round_half_up(adjusted_base * bracket.rate - bracket.deductible),
                    Decimal::ZERO,
                )
            })
            .unwrap_or(Decimal::ZERO)
    }

    fn taxable_base(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(gross_income - total_deductions, Decimal::ZERO)
    }

    fn adjusted_base(
        &self,
        taxable_base: Decimal,
    ) -> Decimal {
        max(
            round_half_up(taxable_base - self.rules.standard_deduction),
            Decimal::ZERO,
        )
    }

    fn slice(
        &self,
        adjusted_base: Decimal,
    ) -> Vec<BracketSlice> {
        let mut remaining = adjusted_base;
        let mut lower_bound = Decimal::ZERO;
        let mut slices = Vec::with_capacity(self.rules.brackets.len());

        for bracket in &self.rules.brackets {
            let income_in_bracket = if remaining > Decimal::ZERO {
                let ceiling = bracket
                    .upper_bound
                    .map_or(adjusted_base, |upper| adjusted_base.min(upper));
                max(ceiling - lower_bound, Decimal::ZERO)
            } else {
                Decimal::ZERO
            };
            remaining -= income_in_bracket;

            slices.push(BracketSlice {
                lower_bound,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                income_in_bracket,
                tax_in_bracket: round_half_up(income_in_bracket * bracket.rate),
            });

            if let Some(upper) = bracket.upper_bound {
                lower_bound = upper;
            }
        }

        slices
    }

    fn filing_status(
        &self,
        filing_required: bool,
        tax_due: Decimal,
    ) -> FilingStatus {
        if !filing_required {
            FilingStatus::NotTaxable
        } else if tax_due.is_zero() {
            FilingStatus::Exempt
        } else {
            FilingStatus::Taxable
        }
    }
}

/// Cumulative deductibles implied by a table's bounds and rates.
///
/// Entry `i` is the amount to subtract from `base × rate_i` so the one-step
/// formula matches the progressive walk. Values are rounded to cents.
pub fn expected_deductibles(brackets: &[TaxBracket]) -> Vec<Decimal> {
    let mut deductible = Decimal::ZERO;
    let mut previous: Option<&TaxBracket> = None;
    let mut expected = Vec::with_capacity(brackets.len());

    for bracket in brackets {
        if let Some(prev) = previous {
            let bound = prev.upper_bound.unwrap_or(Decimal::ZERO);
            deductible += bound * (bracket.rate - prev.rate);
        }
        expected.push(round_half_up(deductible));
        previous = Some(bracket);
    }

    expected
}
