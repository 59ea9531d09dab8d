//! Plain-text rendering of the estimator form.

use std::fmt::Write;

use loan_core::form::Selector;
use loan_core::{Field, FormState, FormView};

const LABEL_WIDTH: usize = 20;

/// Renders fields, error messages and, when active, the results.
pub fn render(form: &FormState) -> String {
    let mut out = String::new();

    row(&mut out, "Sales price", &form.value(Field::SalesPrice), None);
    row(
        &mut out,
        "APR (%)",
        &form.value(Field::Apr),
        Some(form.apr_selector()),
    );
    row(
        &mut out,
        "Number of payments",
        &form.value(Field::NumPayments),
        Some(form.num_payments_selector()),
    );

    for field in Field::ALL {
        if let Some(message) = form.error(field) {
            let _ = writeln!(out, "  ! {message}");
        }
    }

    out.push_str(&"-".repeat(40));
    out.push('\n');
    if form.results_active() {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Down payment:", form.down_payment_text());
        let _ = writeln!(
            out,
            "{:<LABEL_WIDTH$}{}",
            "Monthly payment:",
            form.monthly_payment_text()
        );
    } else {
        out.push_str("Payments appear once every field is valid.\n");
    }
    out
}

fn row(
    out: &mut String,
    label: &str,
    value: &str,
    selector: Option<&Selector>,
) {
    let value = if value.is_empty() { "(none)" } else { value };
    let label = format!("{label}:");
    let _ = write!(out, "{label:<LABEL_WIDTH$}{value:<12}");
    if let Some(selector) = selector {
        let _ = write!(out, "[{}]", selector.options().join(" | "));
    }
    out.push('\n');
}
