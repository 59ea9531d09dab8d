//! Loan payment calculations.
//!
//! Pure functions with no validation of their own; callers pass inputs that
//! have already been parsed and validated by the form layer.

pub mod common;
pub mod payment;

pub use payment::{
    DOWN_PAYMENT_RATE, MONTHLY_SURCHARGE, down_payment, estimate, monthly_payment, monthly_rate,
};
