//! Series date handling.
//!
//! Two textual forms are accepted: `DD-MM-YY` (canonical) and the legacy
//! `DD-MM-YYYY`. Everything written by this service uses the canonical form.

use chrono::NaiveDate;

use super::model::SeriesEntry;
use crate::errors::DateFormatError;

/// Canonical `DD-MM-YY` format.
pub const CANONICAL_DATE_FORMAT: &str = "%d-%m-%y";

/// Legacy `DD-MM-YYYY` format still found in older data files.
pub const LONG_DATE_FORMAT: &str = "%d-%m-%Y";

/// Parses a series date, trying the canonical short form first.
///
/// The order matters: `%Y` would accept `"05-01-24"` as year 24 AD.
pub fn parse_quote_date(input: &str) -> Result<NaiveDate, DateFormatError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, CANONICAL_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, LONG_DATE_FORMAT))
        .map_err(|_| DateFormatError::new(input))
}

pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Rewrites an accepted date string in canonical form.
pub fn normalize_date(input: &str) -> Result<String, DateFormatError> {
    parse_quote_date(input).map(format_canonical)
}

/// Stable sort by calendar date.
///
/// Entries whose date does not parse keep their relative order and come first.
pub fn sort_entries_by_date(entries: &mut [SeriesEntry]) {
    entries.sort_by_key(|entry| parse_quote_date(&entry.date).ok());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_both_forms_parse_to_same_day() {
        assert_eq!(parse_quote_date("05-01-24").unwrap(), ymd(2024, 1, 5));
        assert_eq!(parse_quote_date("05-01-2024").unwrap(), ymd(2024, 1, 5));
    }

    #[test]
    fn test_iso_is_rejected() {
        let err = parse_quote_date("2024-01-05").unwrap_err();
        assert_eq!(err.input, "2024-01-05");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_quote_date("").is_err());
        assert!(parse_quote_date("32-01-24").is_err());
        assert!(parse_quote_date("hoy").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(parse_quote_date(" 31-12-23 ").unwrap(), ymd(2023, 12, 31));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_date("05-01-2024").unwrap(), "05-01-24");
        assert_eq!(normalize_date("05-01-24").unwrap(), "05-01-24");
    }

    #[test]
    fn test_sort_is_stable_with_unparseable_first() {
        let mut entries = vec![
            SeriesEntry::new("03-01-24", dec!(3)),
            SeriesEntry::new("bad", dec!(0)),
            SeriesEntry::new("01-01-2024", dec!(1)),
            SeriesEntry::new("02-01-24", dec!(2)),
            SeriesEntry::new("also bad", dec!(-1)),
        ];
        sort_entries_by_date(&mut entries);
        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["bad", "also bad", "01-01-2024", "02-01-24", "03-01-24"]
        );
    }
}
