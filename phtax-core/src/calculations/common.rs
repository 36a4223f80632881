//! Small numeric helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to centavos using half-up rounding (away from zero at the midpoint).
///
/// The calculators never round their own results; this is for presentation.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(917.244)), dec!(917.24));
/// assert_eq!(round_half_up(dec!(4568.335)), dec!(4568.34));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Converts a whole-number percentage (`10` for 10%) into a fraction.
pub fn percent(rate: Decimal) -> Decimal {
    rate / Decimal::ONE_HUNDRED
}
