use std::sync::LazyLock;

use phtax_core::calculations::common::round_half_up;
use regex::Regex;
use rust_decimal::Decimal;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("pattern is a valid regex"));

/// Largest amount accepted from the command line: 10^15.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Keeps only digits and the first decimal point.
///
/// Everything from a second `.` onwards is dropped, so `"1.2.3"` becomes
/// `"1.2"`. Signs are stripped like any other character.
pub fn sanitize_amount(s: &str) -> String {
    let digits = NON_NUMERIC.replace_all(s, "");
    let mut parts = digits.splitn(3, '.');
    match (parts.next(), parts.next()) {
        (Some(whole), Some(fraction)) => format!("{whole}.{fraction}"),
        (Some(whole), None) => whole.to_string(),
        _ => String::new(),
    }
}

/// Parses a user-entered amount such as `"₱50,000.00"` into a [`Decimal`].
///
/// The input is first passed through [`sanitize_amount`] and a trailing `.`
/// is dropped. Empty input is 0; anything still unparsable, or larger than
/// [`MAX_AMOUNT`], is logged and treated as 0.
pub fn parse_amount(s: &str) -> Decimal {
    let sanitized = sanitize_amount(s);
    let sanitized = sanitized.trim_end_matches('.');
    if sanitized.is_empty() {
        return Decimal::ZERO;
    }
    match sanitized.parse::<Decimal>() {
        Ok(value) if value > MAX_AMOUNT => {
            tracing::warn!(input = %s, max = %MAX_AMOUNT, "amount too large, using 0");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(input = %s, "invalid amount, using 0: {}", e);
            Decimal::ZERO
        }
    }
}

/// Inserts `,` every three digits into the whole part of a plain decimal
/// string.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

fn format_money(
    symbol: &str,
    value: Decimal,
) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    let text = group_thousands(&rounded.to_string());
    match text.strip_prefix('-') {
        Some(rest) => format!("-{symbol}{rest}"),
        None => format!("{symbol}{text}"),
    }
}

/// Formats a peso amount for display: `₱1,234.57`.
pub fn format_php(value: Decimal) -> String {
    format_money("₱", value)
}

/// Formats a US dollar amount for display: `$1,234.57`.
pub fn format_usd(value: Decimal) -> String {
    format_money("$", value)
}

/// Formats a whole peso amount without centavos: `₱250,000`.
pub fn format_php_whole(value: Decimal) -> String {
    let mut rounded = value.round();
    rounded.rescale(0);
    format!("₱{}", group_thousands(&rounded.to_string()))
}

/// Formats a fractional rate as a percent with one decimal: `0.025` is
/// `2.5%`, `0` is `0%`.
pub fn format_rate(fraction: Decimal) -> String {
    if fraction.is_zero() {
        return "0%".to_string();
    }
    let mut percent = (fraction * Decimal::ONE_HUNDRED).round_dp(1);
    percent.rescale(1);
    format!("{percent}%")
}
