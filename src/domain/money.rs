use std::fmt;

use serde::{Deserialize, Deserializer, Serializer};

use crate::config::CURRENCY_SYMBOL;

/// Money is represented as integer cents to avoid floating-point drift when
/// summing many payments. S/ 80.50 = 8050 cents.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 8050 -> "80.50", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents with the clinic's currency symbol: 8000 -> "S/ 80.00".
pub fn format_money(cents: Cents) -> String {
    format!("{} {}", CURRENCY_SYMBOL, format_cents(cents))
}

/// Convert a decimal amount as sent by the backend into cents, rounding to the
/// nearest cent. Non-finite input maps to 0.
pub fn cents_from_decimal(amount: f64) -> Cents {
    if !amount.is_finite() {
        return 0;
    }
    (amount * 100.0).round() as Cents
}

/// Convert cents back into the backend's decimal representation.
pub fn cents_to_decimal(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Parse a decimal string into cents.
/// Example: "80.00" -> 8000, "12.5" -> 1250, "100" -> 10000
///
/// Digits past the second decimal place are truncated. Anything that is not
/// an ASCII digit, or a value that does not fit in `Cents`, is rejected.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };
    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !decimal_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };

    // Only ASCII digits remain, so byte offsets are char boundaries.
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        // "5" after the point means 50 cents
        1 => i64::from(decimal_str.as_bytes()[0] - b'0') * 10,
        _ => decimal_str[..2].parse().map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::InvalidFormat)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(f64),
    Text(String),
}

/// Serde adapter for amounts sent as JSON numbers (`80.5`) or decimal strings
/// (`"80.50"`). `null` is read as zero.
pub mod amount {
    use super::*;

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cents_to_decimal(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let wire: Option<WireAmount> = Option::deserialize(deserializer)?;
        match wire {
            None => Ok(0),
            Some(WireAmount::Number(n)) => Ok(cents_from_decimal(n)),
            Some(WireAmount::Text(s)) => parse_cents(&s).map_err(serde::de::Error::custom),
        }
    }
}
