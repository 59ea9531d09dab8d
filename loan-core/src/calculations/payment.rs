//! Down payment and amortized monthly payment calculations.
//!
//! # Formula
//!
//! | Quantity | Expression |
//! |----------|------------|
//! | Down payment | `price × 0.15` |
//! | Loan amount | `price − down payment` |
//! | Monthly rate `r` | `apr ÷ 100 ÷ 12` |
//! | Monthly payment | `loan × r ÷ (1 − (1 + r)^−n) + 10` |
//!
//! All arithmetic is plain `f64` with no intermediate rounding. Rounding to
//! cents belongs to the display layer.
//!
//! # Example
//!
//! ```
//! use loan_core::calculations::{down_payment, monthly_payment};
//!
//! assert_eq!(down_payment(20000.0), 3000.0);
//!
//! let payment = monthly_payment(20000.0, 16.9, 120);
//! assert!(payment > 10.0 && payment.is_finite());
//! ```

use crate::models::PaymentEstimate;

/// Share of the sales price paid up front.
pub const DOWN_PAYMENT_RATE: f64 = 0.15;

/// Flat amount added to every monthly payment.
pub const MONTHLY_SURCHARGE: f64 = 10.0;

/// Returns the down payment for `price`.
///
/// The caller guarantees `price` is a positive finite number.
pub fn down_payment(price: f64) -> f64 {
    price * DOWN_PAYMENT_RATE
}

/// Converts an annual percentage rate into the per-month fractional rate.
pub fn monthly_rate(apr_percent: f64) -> f64 {
    apr_percent / 100.0 / 12.0
}

/// Returns the amortized monthly payment on the financed balance plus the
/// flat surcharge.
///
/// `apr_percent` must be greater than zero: at exactly zero the annuity
/// denominator `1 − (1 + r)^−n` collapses to zero and the result is not finite.
pub fn monthly_payment(
    price: f64,
    apr_percent: f64,
    num_payments: u32,
) -> f64 {
    let loan_amount = price - down_payment(price);
    let rate = monthly_rate(apr_percent);
    let base_payment = (loan_amount * rate) / (1.0 - (1.0 + rate).powf(-f64::from(num_payments)));

    base_payment + MONTHLY_SURCHARGE
}

/// Computes both derived amounts for one set of validated inputs.
pub fn estimate(
    price: f64,
    apr_percent: f64,
    num_payments: u32,
) -> PaymentEstimate {
    PaymentEstimate {
        down_payment: down_payment(price),
        monthly_payment: monthly_payment(price, apr_percent, num_payments),
    }
}
