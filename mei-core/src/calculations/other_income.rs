//! Annualizes the other-income inputs.
//!
//! Rental expenses are reported beside the gross rental figure but are not
//! subtracted from the total. Pension and donations received are tracked as
//! non-taxable and stay out of the total as well.

use rust_decimal::Decimal;

use super::common::{clamp_non_negative, round_half_up};
use crate::models::{OtherIncomeInputs, OtherIncomeSummary, TaxRules};

/// `monthly × months`, rounded.
pub fn annualize(
    monthly: Decimal,
    months: u32,
) -> Decimal {
    round_half_up(monthly * Decimal::from(months))
}

pub fn summarize_other_income(
    inputs: &OtherIncomeInputs,
    rules: &TaxRules,
) -> OtherIncomeSummary {
    let salary_months = inputs.salary.months.unwrap_or(rules.default_salary_months);
    let rental_months = inputs.rental.months.unwrap_or(rules.default_rental_months);

    let salary_annual = annualize(
        clamp_non_negative("salary.monthly", inputs.salary.monthly),
        salary_months,
    );
    let rental_annual = annualize(
        clamp_non_negative("rental.monthly", inputs.rental.monthly),
        rental_months,
    );
    let rental_expenses =
        clamp_non_negative("rental.allowed_expenses", inputs.rental.allowed_expenses);

    let investments = &inputs.investments;
    let investment_total = round_half_up(
        clamp_non_negative("investments.dividends", investments.dividends)
            + clamp_non_negative("investments.capital_interest", investments.capital_interest)
            + clamp_non_negative("investments.stock_yields", investments.stock_yields)
            + clamp_non_negative(
                "investments.real_estate_fund_yields",
                investments.real_estate_fund_yields,
            ),
    );

    let misc = &inputs.miscellaneous;
    let taxable_miscellaneous = clamp_non_negative("miscellaneous.other", misc.other);
    let non_taxable_total = round_half_up(
        clamp_non_negative("miscellaneous.pension_received", misc.pension_received)
            + clamp_non_negative("miscellaneous.donations_received", misc.donations_received),
    );

    OtherIncomeSummary {
        salary_annual,
        rental_annual,
        rental_expenses,
        rental_net: round_half_up(rental_annual - rental_expenses),
        investment_total,
        taxable_miscellaneous,
        non_taxable_total,
        total: round_half_up(
            salary_annual + rental_annual + investment_total + taxable_miscellaneous,
        ),
    }
}
