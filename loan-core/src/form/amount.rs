//! Parsing and formatting of the raw text held by the form fields.
//!
//! Parsers return `None` where a browser-style parser would yield `NaN`:
//! the text is empty, malformed, or not finite.

use std::sync::OnceLock;

use regex::Regex;

use crate::calculations::common::to_cents;

fn non_numeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\-]+").expect("valid regex"))
}

fn float_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+\-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+\-]?\d+)?").expect("valid regex")
    })
}

fn integer_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+\-]?\d+").expect("valid regex"))
}

/// Parses a currency amount, tolerating symbols and separators.
///
/// Every character other than a digit, `.` or `-` is dropped before parsing,
/// so `"$12,345.00"` reads as `12345.0`. What remains must be a well-formed
/// number; `"1.2.3"` or a bare `"-"` yield `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let stripped = non_numeric().replace_all(raw, "");
    stripped
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a rate the way a lenient float parser does: leading whitespace is
/// skipped and the longest numeric prefix is taken (`"16.9%"` reads as 16.9).
pub fn parse_rate(raw: &str) -> Option<f64> {
    let m = float_prefix().find(raw.trim_start())?;
    m.as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses the leading signed run of decimal digits (`"12.5"` reads as 12).
pub fn parse_count(raw: &str) -> Option<i64> {
    let m = integer_prefix().find(raw.trim_start())?;
    m.as_str().parse::<i64>().ok()
}

/// Formats an amount as en-US dollars: `$` symbol, comma thousands
/// separators, exactly two decimals. Negative amounts render as `-$1.00`,
/// including ones that round to zero.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let symbol = if value > 0.0 { "$∞" } else { "-$∞" };
        return symbol.to_string();
    }

    let digits = match to_cents(value) {
        Some(cents) => format!("{:.2}", cents.abs()),
        None => format!("{:.2}", value.abs()),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if value.is_sign_negative() { "-" } else { "" };

    format!("{sign}${}.{fraction}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
