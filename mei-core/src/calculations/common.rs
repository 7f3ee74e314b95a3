//! Shared helpers for the calculators: rounding, clamping and guarded ratios.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Rounds to two decimal places, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use mei_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(365.787)), dec!(365.79));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Floors a user-supplied amount at zero, logging when a negative value is
/// dropped so it never reaches the bracket engine.
pub fn clamp_non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, %value, "negative input clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// `numerator / denominator × 100`, rounded; zero when the denominator is zero.
pub fn percent_of(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    round_half_up(numerator / denominator * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_negative_and_zero() {
        assert_eq!(max(dec!(-50.00), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // clamp_non_negative tests
    // =========================================================================

    #[test]
    fn clamp_non_negative_keeps_positive_values() {
        assert_eq!(clamp_non_negative("x", dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn clamp_non_negative_floors_negative_values() {
        assert_eq!(clamp_non_negative("x", dec!(-0.01)), Decimal::ZERO);
    }

    // =========================================================================
    // percent_of tests
    // =========================================================================

    #[test]
    fn percent_of_guards_zero_denominator() {
        assert_eq!(percent_of(dec!(100), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn percent_of_rounds_to_two_places() {
        assert_eq!(percent_of(dec!(365.79), dec!(30000)), dec!(1.22));
        assert_eq!(percent_of(dec!(72900), dec!(81000)), dec!(90.00));
    }
}
