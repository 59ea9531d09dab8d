//! Common helpers shared by the payment calculations and their display.
//!
//! The calculator itself works in `f64`; conversion to [`Decimal`] happens only
//! when an amount is about to be shown to the user.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, which matches how
/// currency amounts are presented in en-US.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a computed `f64` amount into a [`Decimal`] rounded to cents.
///
/// The binary value is carried over without prior truncation so that the
/// rounding step sees the exact amount the calculator produced.
///
/// Returns `None` for NaN, infinities, and magnitudes beyond what a
/// [`Decimal`] can represent.
pub fn to_cents(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64_retain(value).map(round_half_up)
}
