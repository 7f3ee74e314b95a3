use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Income and tax attributed to one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub income_in_bracket: Decimal,
    pub tax_in_bracket: Decimal,
}

/// Output of one bracket-engine run. Always recomputed in full.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// MEI profit plus other income, what-if deltas merged.
    pub gross_income: Decimal,
    /// All deduction buckets, what-if deltas merged.
    pub total_deductions: Decimal,
    pub taxable_base: Decimal,
    /// Taxable base minus the standard deduction, floored at zero.
    pub adjusted_base: Decimal,
    pub tax_due: Decimal,
    pub brackets: Vec<BracketSlice>,
    /// Tax due as a percentage of gross income.
    pub effective_rate: Decimal,
    pub filing_status: FilingStatus,
    pub filing_required: bool,
}
