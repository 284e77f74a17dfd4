//! Report formatting for summary figures.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder for any figure that has no value.
pub const MISSING: &str = "-";

/// `1 234 567.89 €`; a missing value renders as [`MISSING`].
pub fn format_currency(value: Option<Decimal>, decimals: u32) -> String {
    match value {
        Some(v) => format!("{} €", group_thousands(v, decimals)),
        None => MISSING.to_string(),
    }
}

/// Percentage with at most `decimals` fraction digits and no trailing zeros.
pub fn format_percent(value: Option<Decimal>, decimals: u32) -> String {
    match value {
        Some(v) => {
            let rounded = v
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            format!("{rounded}%")
        }
        None => MISSING.to_string(),
    }
}

/// Price per m² of a lot; a lot without area shows a dash.
pub fn format_price_per_m2(value: Option<Decimal>) -> String {
    match value {
        Some(v) => group_thousands(v, 0),
        None => MISSING.to_string(),
    }
}

fn group_thousands(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
