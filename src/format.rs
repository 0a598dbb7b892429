//! Display helpers shared by the response formatters.
//!
//! Rounding here is for display only; structured content keeps the values
//! exactly as the API returned them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Placeholder for fields the API did not return.
pub const NOT_AVAILABLE: &str = "N/A";

/// Price with four decimal places.
pub fn format_price(value: f64) -> String {
    format!("{:.4}", normalize_zero(value))
}

/// Quoted price with up to six decimals, never fewer than four.
///
/// Keeps sub-cent movement visible for quotes like `1.234567` while
/// `0` still reads `0.0000`.
pub fn format_quote_price(value: f64) -> String {
    let full = format!("{:.6}", normalize_zero(value));
    let (int_part, frac) = full.split_once('.').unwrap_or((full.as_str(), ""));
    let mut frac = frac.trim_end_matches('0').to_string();
    while frac.len() < 4 {
        frac.push('0');
    }
    format!("{int_part}.{frac}")
}

/// Percentage with two decimal places.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", normalize_zero(value))
}

/// Percentage change with an explicit sign for non-zero values.
pub fn format_change(value: f64) -> String {
    if normalize_zero(value) > 0.0 {
        format!("+{}", format_percent(value))
    } else {
        format_percent(value)
    }
}

/// Dollar amount with thousands separators and two decimals.
pub fn format_usd(value: f64) -> String {
    let value = normalize_zero(value);
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(int_part);
    if negative {
        format!("-${grouped}.{frac}")
    } else {
        format!("${grouped}.{frac}")
    }
}

/// Whole count with thousands separators.
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Convert a raw integer amount with `decimals` into a decimal string.
///
/// `("1000000000", 9)` becomes `"1"`; unparseable input is returned as-is.
pub fn format_token_amount(raw: &str, decimals: u32) -> String {
    match Decimal::from_str(raw.trim()) {
        Ok(mut value) if decimals <= 28 => {
            if value.set_scale(value.scale() + decimals).is_err() {
                return raw.to_string();
            }
            value.normalize().to_string()
        }
        _ => raw.to_string(),
    }
}

/// RFC 3339 timestamp as `YYYY-MM-DD HH:MM UTC`; other input is returned as-is.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn or_na<T, F>(value: Option<T>, f: F) -> String
where
    F: FnOnce(T) -> String,
{
    value.map(f).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// -0.0 and NaN would otherwise print as "-0.0000" / "NaN".
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        0.0
    } else {
        value
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
