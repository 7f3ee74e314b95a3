use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Salary received as an employee alongside the MEI activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryIncome {
    pub monthly: Decimal,
    /// Months paid in the year; `None` falls back to the configured default (13).
    pub months: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalIncome {
    pub monthly: Decimal,
    /// Months rented in the year; `None` falls back to the configured default (12).
    pub months: Option<u32>,
    /// Expenses the landlord may offset (condo fees, property tax, agency fees).
    pub allowed_expenses: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentIncome {
    pub dividends: Decimal,
    /// Interest on own capital ("juros sobre capital próprio").
    pub capital_interest: Decimal,
    pub stock_yields: Decimal,
    pub real_estate_fund_yields: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscellaneousIncome {
    /// Tracked for the report but excluded from the taxable total.
    pub pension_received: Decimal,
    /// Tracked for the report but excluded from the taxable total.
    pub donations_received: Decimal,
    pub other: Decimal,
}

/// Raw other-income inputs for one tax-year snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherIncomeInputs {
    pub salary: SalaryIncome,
    pub rental: RentalIncome,
    pub investments: InvestmentIncome,
    pub miscellaneous: MiscellaneousIncome,
}

/// Annualized view of [`OtherIncomeInputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherIncomeSummary {
    pub salary_annual: Decimal,
    /// Gross rental income; this is what enters `total`.
    pub rental_annual: Decimal,
    pub rental_expenses: Decimal,
    /// Display only.
    pub rental_net: Decimal,
    pub investment_total: Decimal,
    pub taxable_miscellaneous: Decimal,
    pub non_taxable_total: Decimal,
    pub total: Decimal,
}
