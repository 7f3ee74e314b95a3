//! One full recomputation: ledger sums, other income, deductions, what-if
//! overlay and bracket engine, in that order, over a state snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bracket_engine::BracketEngine;
use super::common::{max, round_half_up};
use super::deductions::DeductionCalculator;
use super::other_income::summarize_other_income;
use super::what_if::apply_overlay;
use crate::models::{Deductions, OrganizerState, OtherIncomeSummary, SimulationResult, TaxRules};

/// Every intermediate figure of a run, for reports and checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub revenue_total: Decimal,
    pub expense_total: Decimal,
    /// Revenue minus expenses, floored at zero.
    pub mei_profit: Decimal,
    pub other_income: OtherIncomeSummary,
    pub deductions: Deductions,
    pub simulation: SimulationResult,
}

pub fn run_pipeline(
    state: &OrganizerState,
    rules: &TaxRules,
) -> PipelineOutput {
    let revenue_total = round_half_up(state.ledger.total_revenue());
    let expense_total = round_half_up(state.ledger.total_expenses());
    let mei_profit = max(revenue_total - expense_total, Decimal::ZERO);

    let other_income = summarize_other_income(&state.other_income, rules);
    let deductions = DeductionCalculator::new(rules).calculate(&state.deductions);

    let overlaid = apply_overlay(
        mei_profit + other_income.total,
        deductions.total,
        &state.what_if,
        rules,
    );
    let simulation =
        BracketEngine::new(rules).calculate(overlaid.gross_income, overlaid.total_deductions);

    PipelineOutput {
        revenue_total,
        expense_total,
        mei_profit,
        other_income,
        deductions,
        simulation,
    }
}

/// Recomputes the simulation from scratch, ignoring any cached result.
pub fn recalculate(
    state: &OrganizerState,
    rules: &TaxRules,
) -> SimulationResult {
    run_pipeline(state, rules).simulation
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        FilingStatus, NewExpenseEntry, NewRevenueEntry, SalaryIncome, WhatIfScenario,
    };

    fn state_with(revenue: Decimal, expense: Decimal) -> OrganizerState {
        let rules = TaxRules::default();
        let mut state = OrganizerState::default();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1);
        if revenue > Decimal::ZERO {
            state
                .ledger
                .add_revenue(NewRevenueEntry {
                    source: "Cliente".to_string(),
                    amount: revenue,
                    date,
                    ..Default::default()
                })
                .unwrap();
        }
        if expense > Decimal::ZERO {
            state
                .ledger
                .add_expense(
                    NewExpenseEntry {
                        description: "Material".to_string(),
                        amount: expense,
                        date,
                        ..Default::default()
                    },
                    &rules,
                )
                .unwrap();
        }
        state
    }

    #[test]
    fn empty_state_is_not_taxable() {
        let result = recalculate(&OrganizerState::default(), &TaxRules::default());

        assert_eq!(result.taxable_base, dec!(0));
        assert_eq!(result.tax_due, dec!(0));
        assert_eq!(result.filing_status, FilingStatus::NotTaxable);
        assert!(!result.filing_required);
    }

    #[test]
    fn profit_of_thirty_thousand_is_taxable() {
        let state = state_with(dec!(45000), dec!(15000));

        let output = run_pipeline(&state, &TaxRules::default());

        assert_eq!(output.mei_profit, dec!(30000));
        assert_eq!(output.simulation.tax_due, dec!(365.79));
        assert_eq!(output.simulation.filing_status, FilingStatus::Taxable);
    }

    #[test]
    fn expenses_above_revenue_floor_profit_at_zero() {
        let output = run_pipeline(&state_with(dec!(1000), dec!(5000)), &TaxRules::default());

        assert_eq!(output.mei_profit, dec!(0));
        assert_eq!(output.simulation.gross_income, dec!(0));
    }

    #[test]
    fn other_income_adds_to_gross() {
        let mut state = state_with(dec!(10000), dec!(0));
        state.other_income.salary = SalaryIncome {
            monthly: dec!(1000),
            months: None,
        };

        let result = recalculate(&state, &TaxRules::default());

        assert_eq!(result.gross_income, dec!(23000));
    }

    #[test]
    fn deductions_above_gross_zero_the_tax() {
        let mut state = state_with(dec!(20000), dec!(0));
        state.deductions.health.medical = dec!(25000);

        let result = recalculate(&state, &TaxRules::default());

        assert_eq!(result.gross_income, dec!(20000));
        assert_eq!(result.total_deductions, dec!(25000));
        assert_eq!(result.taxable_base, dec!(0));
        assert_eq!(result.tax_due, dec!(0));
        assert!(!result.filing_required);
    }

    #[test]
    fn inactive_what_if_matches_reset_scenario() {
        let mut stored = state_with(dec!(50000), dec!(8000));
        stored.what_if = WhatIfScenario {
            active: false,
            additional_revenue: dec!(10000),
            additional_dependents: 2,
            ..Default::default()
        };
        let mut reset = stored.clone();
        reset.what_if.deactivate();

        let rules = TaxRules::default();

        assert_eq!(recalculate(&stored, &rules), recalculate(&reset, &rules));
    }

    #[test]
    fn active_what_if_changes_the_result_without_touching_the_ledger() {
        let mut state = state_with(dec!(30000), dec!(0));
        state.what_if = WhatIfScenario::new(dec!(10000), dec!(0), 1, dec!(0));
        let ledger_before = state.ledger.clone();

        let result = recalculate(&state, &TaxRules::default());

        assert_eq!(result.gross_income, dec!(40000));
        assert_eq!(result.total_deductions, dec!(2275.08));
        assert_eq!(state.ledger, ledger_before);
    }

    #[test]
    fn negative_what_if_pension_leaves_deductions_unchanged() {
        let mut state = OrganizerState::default();
        state.other_income.salary = SalaryIncome {
            monthly: dec!(40000),
            months: Some(1),
        };
        state.deductions.health.medical = dec!(10000);
        let rules = TaxRules::default();
        let base = recalculate(&state, &rules);

        state.what_if = WhatIfScenario::new(dec!(0), dec!(0), 0, dec!(-8000));
        let result = recalculate(&state, &rules);

        assert_eq!(base.total_deductions, dec!(10000));
        assert_eq!(result.total_deductions, base.total_deductions);
        assert_eq!(result.tax_due, base.tax_due);
    }

    #[test]
    fn cached_simulation_is_ignored() {
        let mut state = state_with(dec!(30000), dec!(0));
        state.simulation = Some(SimulationResult {
            tax_due: dec!(99999),
            ..Default::default()
        });

        assert_eq!(recalculate(&state, &TaxRules::default()).tax_due, dec!(365.79));
    }
}
