//! Parsing of prices as they are printed on Argentine sites.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;

lazy_static! {
    /// "1.234,56": dot thousands separator followed by a comma decimal part.
    static ref DOT_THOUSANDS_COMMA_DECIMAL: Regex = Regex::new(r"\.\d{3},").unwrap();
    /// "1234,56": comma used only as decimal separator.
    static ref COMMA_DECIMAL: Regex = Regex::new(r",\d{1,2}$").unwrap();
    /// "1.234.567" or "1.234": dots used only as thousands separators.
    static ref DOT_THOUSANDS_ONLY: Regex = Regex::new(r"^\d{1,3}(\.\d{3})+$").unwrap();
}

/// Converts a displayed price into a decimal rounded to two places.
///
/// Handled shapes:
/// - `"1.000,00"` -> 1000.00
/// - `"1000,50"` -> 1000.50
/// - `"1000"` / `"1000.5"` -> as is
/// - a leading `$` and surrounding whitespace are ignored
pub fn parse_price(raw: &str) -> Result<Decimal, MarketDataError> {
    let trimmed = raw.trim().trim_start_matches('$').trim();

    let clean = if DOT_THOUSANDS_COMMA_DECIMAL.is_match(trimmed) {
        trimmed.replace('.', "").replace(',', ".")
    } else if COMMA_DECIMAL.is_match(trimmed) {
        trimmed.replace(',', ".")
    } else if DOT_THOUSANDS_ONLY.is_match(trimmed) && trimmed.matches('.').count() > 1 {
        trimmed.replace('.', "")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&clean)
        .map(|value| value.round_dp(2))
        .map_err(|_| MarketDataError::InvalidPrice(raw.to_string()))
}
