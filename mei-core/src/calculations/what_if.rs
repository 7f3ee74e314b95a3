//! Hypothetical deltas merged into the engine inputs.

use rust_decimal::Decimal;

use super::common::clamp_non_negative;
use crate::models::{TaxRules, WhatIfScenario};

/// Gross income and deductions after the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlaid {
    pub gross_income: Decimal,
    pub total_deductions: Decimal,
}

/// Adds the scenario's deltas to the real figures.
///
/// An inactive scenario returns the inputs unchanged whatever deltas it
/// still holds. Negative deltas are clamped to zero, so an overlay can only
/// add revenue, expenses or deductions.
pub fn apply_overlay(
    base_income: Decimal,
    base_deductions: Decimal,
    scenario: &WhatIfScenario,
    rules: &TaxRules,
) -> Overlaid {
    if !scenario.active {
        return Overlaid {
            gross_income: base_income,
            total_deductions: base_deductions,
        };
    }

    let revenue = clamp_non_negative("what_if.additional_revenue", scenario.additional_revenue);
    let expense = clamp_non_negative("what_if.additional_expense", scenario.additional_expense);
    let pension = clamp_non_negative(
        "what_if.additional_pension_contribution",
        scenario.additional_pension_contribution,
    );

    Overlaid {
        gross_income: base_income + revenue - expense,
        total_deductions: base_deductions
            + Decimal::from(scenario.additional_dependents) * rules.dependent_allowance
            + pension,
    }
}
