//! The presentation surface the controller drives.
//!
//! [`FormView`] names every element the controller reads or writes.
//! [`FormState`] is a plain in-memory form that hosts can render however they
//! like; tests use it directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::form::amount::format_amount;
use crate::models::Field;

/// Read/write access to the on-screen form.
pub trait FormView {
    /// Current raw text of `field`. A selector with nothing selected reads `""`.
    fn value(
        &self,
        field: Field,
    ) -> String;

    fn set_value(
        &mut self,
        field: Field,
        value: &str,
    );

    /// Shows `message` in the field's error slot, or empties the slot.
    fn set_error(
        &mut self,
        field: Field,
        message: Option<&str>,
    );

    fn set_down_payment(
        &mut self,
        text: &str,
    );

    fn set_monthly_payment(
        &mut self,
        text: &str,
    );

    /// Marks the results container active (shown) or inactive (hidden).
    fn set_results_active(
        &mut self,
        active: bool,
    );

    fn results_active(&self) -> bool;
}

pub const DEFAULT_APR_OPTIONS: [&str; 5] = ["9.9", "12.9", "16.9", "19.9", "24.9"];

pub const DEFAULT_NUM_PAYMENTS_OPTIONS: [&str; 10] =
    ["12", "24", "36", "48", "60", "72", "84", "96", "108", "120"];

/// Value-plus-reset defaults for the two selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub apr: String,
    pub num_payments: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            apr: "16.9".to_string(),
            num_payments: "120".to_string(),
        }
    }
}

/// A dropdown over a fixed list of option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    options: Vec<String>,
    selected: Option<usize>,
}

impl Selector {
    pub fn new(
        options: Vec<String>,
        initial: &str,
    ) -> Self {
        let mut selector = Self {
            options,
            selected: None,
        };
        selector.select(initial);
        selector
    }

    /// Selects `value`. A value that is not one of the options clears the
    /// selection.
    pub fn select(
        &mut self,
        value: &str,
    ) {
        self.selected = self.options.iter().position(|o| o == value);
    }

    pub fn value(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// In-memory estimator form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    sales_price: String,
    apr: Selector,
    num_payments: Selector,
    errors: HashMap<Field, String>,
    down_payment: String,
    monthly_payment: String,
    results_active: bool,
}

impl FormState {
    pub fn new(
        apr_options: Vec<String>,
        num_payments_options: Vec<String>,
        defaults: &FormDefaults,
    ) -> Self {
        let zero = format_amount(0.0);
        Self {
            sales_price: String::new(),
            apr: Selector::new(apr_options, &defaults.apr),
            num_payments: Selector::new(num_payments_options, &defaults.num_payments),
            errors: HashMap::new(),
            down_payment: zero.clone(),
            monthly_payment: zero,
            results_active: false,
        }
    }

    pub fn apr_selector(&self) -> &Selector {
        &self.apr
    }

    pub fn num_payments_selector(&self) -> &Selector {
        &self.num_payments
    }

    pub fn error(
        &self,
        field: Field,
    ) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn down_payment_text(&self) -> &str {
        &self.down_payment
    }

    pub fn monthly_payment_text(&self) -> &str {
        &self.monthly_payment
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(
            DEFAULT_APR_OPTIONS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_NUM_PAYMENTS_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            &FormDefaults::default(),
        )
    }
}

impl FormView for FormState {
    fn value(
        &self,
        field: Field,
    ) -> String {
        match field {
            Field::SalesPrice => self.sales_price.clone(),
            Field::Apr => self.apr.value().to_string(),
            Field::NumPayments => self.num_payments.value().to_string(),
        }
    }

    fn set_value(
        &mut self,
        field: Field,
        value: &str,
    ) {
        match field {
            Field::SalesPrice => self.sales_price = value.to_string(),
            Field::Apr => self.apr.select(value),
            Field::NumPayments => self.num_payments.select(value),
        }
    }

    fn set_error(
        &mut self,
        field: Field,
        message: Option<&str>,
    ) {
        match message {
            Some(m) if !m.is_empty() => {
                self.errors.insert(field, m.to_string());
            }
            _ => {
                self.errors.remove(&field);
            }
        }
    }

    fn set_down_payment(
        &mut self,
        text: &str,
    ) {
        self.down_payment = text.to_string();
    }

    fn set_monthly_payment(
        &mut self,
        text: &str,
    ) {
        self.monthly_payment = text.to_string();
    }

    fn set_results_active(
        &mut self,
        active: bool,
    ) {
        self.results_active = active;
    }

    fn results_active(&self) -> bool {
        self.results_active
    }
}
