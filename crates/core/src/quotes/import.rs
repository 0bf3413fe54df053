//! CSV import of historical values.
//!
//! Accepts the same layout the legacy data files use:
//!
//! ```text
//! fecha,valor
//! 05-01-24,512.30
//! 06-01-2024,513.10
//! ```
//!
//! # Rules
//!
//! - `fecha` and `valor` columns are required (header match is case-insensitive)
//! - every `fecha` must be `DD-MM-YY` or `DD-MM-YYYY`; otherwise the whole file
//!   is rejected and the offending row numbers are reported
//! - rows with an empty or `NaN` `valor` are dropped
//! - each row is upserted under its canonical date (overwrite semantics)

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::dates::parse_quote_date;
use super::model::QuoteType;
use super::store::SeriesStore;
use crate::errors::{Result, ValidationError};

const DATE_COLUMN: &str = "fecha";
const VALUE_COLUMN: &str = "valor";

/// Rows accepted from an import file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedImport {
    pub points: Vec<(NaiveDate, Decimal)>,
    /// Rows dropped because their value was empty.
    pub skipped: usize,
}

/// Outcome returned to the caller of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
}

/// Parses and validates an import file without touching any store.
pub fn parse_import_csv(data: &[u8]) -> std::result::Result<ParsedImport, ValidationError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| ValidationError::InvalidInput(format!("Unreadable CSV header: {}", e)))?
        .clone();
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    let value_idx = column_index(&headers, VALUE_COLUMN)?;

    let mut parsed = ParsedImport::default();
    let mut bad_dates = Vec::new();
    let mut bad_values = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record
            .map_err(|e| ValidationError::InvalidInput(format!("Unreadable CSV row {}: {}", row, e)))?;

        let date = match parse_quote_date(record.get(date_idx).unwrap_or_default()) {
            Ok(date) => Some(date),
            Err(_) => {
                bad_dates.push(row);
                None
            }
        };

        let raw_value = record.get(value_idx).unwrap_or_default();
        if is_missing(raw_value) {
            parsed.skipped += 1;
            continue;
        }
        let value = match parse_value(raw_value) {
            Some(value) => value,
            None => {
                bad_values.push(row);
                continue;
            }
        };

        if let Some(date) = date {
            parsed.points.push((date, value));
        }
    }

    if !bad_dates.is_empty() {
        return Err(ValidationError::InvalidDates { rows: bad_dates });
    }
    if !bad_values.is_empty() {
        return Err(ValidationError::InvalidValues { rows: bad_values });
    }
    Ok(parsed)
}

/// Validates `data` and upserts every accepted row into `store`.
pub async fn import_csv(
    store: &dyn SeriesStore,
    quote_type: QuoteType,
    data: &[u8],
) -> Result<ImportSummary> {
    let parsed = parse_import_csv(data)?;
    debug!(
        "Importing {} rows into {} ({} skipped)",
        parsed.points.len(),
        quote_type,
        parsed.skipped
    );

    let imported = store.upsert_many(quote_type, &parsed.points).await?;
    info!("Imported {} rows into {}", imported, quote_type);

    Ok(ImportSummary {
        message: format!("Imported {} rows into {}", imported, quote_type),
        imported,
        skipped: parsed.skipped,
    })
}

fn column_index(headers: &StringRecord, name: &str) -> std::result::Result<usize, ValidationError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        .ok_or_else(|| ValidationError::MissingField(name.to_string()))
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

fn parse_value(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .or_else(|_| Decimal::from_str(&raw.replace(',', ".")))
        .ok()
}
