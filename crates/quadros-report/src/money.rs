//! Brazilian currency formatting

use quadros_domain::Amount;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Format an amount as `1.234.567,89`
///
/// Values that cannot be read as a number are returned as reported.
pub fn format_brl(amount: &Amount) -> String {
    let parsed = match amount {
        Amount::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Amount::Text(s) => parse_brl_text(s),
    };

    match parsed {
        Some(value) => render(value),
        None => amount.to_string(),
    }
}

/// Format a textual amount, see [`format_brl`]
pub fn format_brl_str(text: &str) -> String {
    match parse_brl_text(text) {
        Some(value) => render(value),
        None => text.to_string(),
    }
}

/// Keep digits and commas, then read the comma as the decimal point
fn parse_brl_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&cleaned).ok()
}

fn render(value: Decimal) -> String {
    // round_dp rounds half to even
    let fixed = format!("{:.2}", value.round_dp(2).abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}{},{}", sign, grouped, fraction)
}
