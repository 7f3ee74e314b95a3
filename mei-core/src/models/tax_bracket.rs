use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the progressive table.
///
/// `upper_bound` is inclusive; `None` marks the unbounded top bracket.
/// `deductible` is the cumulative amount subtracted in the one-step
/// formula `base × rate − deductible`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub deductible: Decimal,
}

impl TaxBracket {
    pub fn bounded(upper_bound: Decimal, rate: Decimal, deductible: Decimal) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
            deductible,
        }
    }

    pub fn unbounded(rate: Decimal, deductible: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
            deductible,
        }
    }

    /// True when `amount` falls at or below this bracket's ceiling.
    pub fn contains(&self, amount: Decimal) -> bool {
        self.upper_bound.is_none_or(|upper| amount <= upper)
    }
}
