use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hypothetical deltas layered over the real ledger and deductions.
///
/// The overlay never touches stored records. Deltas held while `active`
/// is false have no effect on the simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatIfScenario {
    pub active: bool,
    pub additional_revenue: Decimal,
    pub additional_expense: Decimal,
    pub additional_dependents: u32,
    pub additional_pension_contribution: Decimal,
}

impl WhatIfScenario {
    pub fn new(
        additional_revenue: Decimal,
        additional_expense: Decimal,
        additional_dependents: u32,
        additional_pension_contribution: Decimal,
    ) -> Self {
        Self {
            active: true,
            additional_revenue,
            additional_expense,
            additional_dependents,
            additional_pension_contribution,
        }
    }

    /// Turns the scenario off and zeroes every delta.
    pub fn deactivate(&mut self) {
        *self = Self::default();
    }

    pub fn is_neutral(&self) -> bool {
        !self.active
            || (self.additional_revenue.is_zero()
                && self.additional_expense.is_zero()
                && self.additional_dependents == 0
                && self.additional_pension_contribution.is_zero())
    }
}
