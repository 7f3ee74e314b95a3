mod asset;
mod deductions;
mod filing_status;
mod ledger_entries;
mod other_income;
mod profile;
mod simulation_result;
mod state;
mod tax_bracket;
mod tax_rules;
mod what_if;

pub use asset::{AssetEntry, AssetSummary, AssetUse, NewAssetEntry};
pub use deductions::{
    DeductionInputs, Deductions, EducationExpenses, HealthExpenses, HomeOffice,
    PensionContributions,
};
pub use filing_status::FilingStatus;
pub use ledger_entries::{
    DepreciationSchedule, EntryId, EntryKind, ExpenseCategory, ExpenseEntry, NewExpenseEntry,
    NewRevenueEntry, RevenueCategory, RevenueEntry,
};
pub use other_income::{
    InvestmentIncome, MiscellaneousIncome, OtherIncomeInputs, OtherIncomeSummary, RentalIncome,
    SalaryIncome,
};
pub use profile::{Activity, Address, AddressBook, Identification};
pub use simulation_result::{BracketSlice, SimulationResult};
pub use state::{OrganizerState, DEFAULT_SECTION};
pub use tax_bracket::TaxBracket;
pub use tax_rules::{DepreciationRate, TaxRules, TaxRulesError};
pub use what_if::WhatIfScenario;
