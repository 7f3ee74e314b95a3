use serde::{Deserialize, Serialize};

use super::{
    Activity, AddressBook, DeductionInputs, Identification, OtherIncomeInputs, SimulationResult,
    WhatIfScenario,
};
use crate::ledger::Ledger;

/// Section shown when nothing else was persisted.
pub const DEFAULT_SECTION: &str = "home";

/// The whole persisted state tree.
///
/// Missing fields deserialize to their defaults so older snapshots still
/// load. `simulation` is a cache for display only; it is recomputed after
/// every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerState {
    pub identification: Identification,
    pub address: AddressBook,
    pub activity: Activity,
    pub ledger: Ledger,
    pub other_income: OtherIncomeInputs,
    pub deductions: DeductionInputs,
    pub what_if: WhatIfScenario,
    pub simulation: Option<SimulationResult>,
    pub current_section: String,
}

impl Default for OrganizerState {
    fn default() -> Self {
        Self {
            identification: Identification::default(),
            address: AddressBook {
                same_address: true,
                ..AddressBook::default()
            },
            activity: Activity::default(),
            ledger: Ledger::default(),
            other_income: OtherIncomeInputs::default(),
            deductions: DeductionInputs::default(),
            what_if: WhatIfScenario::default(),
            simulation: None,
            current_section: DEFAULT_SECTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_state_starts_on_home_with_shared_address() {
        let state = OrganizerState::default();

        assert_eq!(state.current_section, "home");
        assert!(state.address.same_address);
        assert_eq!(state.simulation, None);
    }

    #[test]
    fn partial_snapshot_fills_missing_fields() {
        let json = r#"{"current_section":"receitas","identification":{"name":"Ana"}}"#;

        let state: OrganizerState = serde_json::from_str(json).unwrap();

        assert_eq!(state.current_section, "receitas");
        assert_eq!(state.identification.name, "Ana");
        assert!(state.ledger.revenues().is_empty());
        assert!(state.address.same_address);
    }
}
