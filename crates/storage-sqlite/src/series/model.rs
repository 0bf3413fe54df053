//! Database models for the `quote_series` table.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use cotizaciones_core::errors::StorageError;
use cotizaciones_core::quotes::format_canonical;
use cotizaciones_core::{QuoteType, SeriesEntry};

/// Values are stored as text to keep the exact decimal representation.
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::quote_series)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteSeriesDB {
    pub id: i32,
    pub quote_type: String,
    pub date: String,
    pub value: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quote_series)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewQuoteSeriesDB {
    pub quote_type: String,
    pub date: String,
    pub value: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewQuoteSeriesDB {
    pub fn new(quote_type: QuoteType, date: NaiveDate, value: Decimal) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            quote_type: quote_type.as_str().to_string(),
            date: format_canonical(date),
            value: value.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<QuoteSeriesDB> for SeriesEntry {
    type Error = StorageError;

    fn try_from(row: QuoteSeriesDB) -> Result<Self, Self::Error> {
        let value = Decimal::from_str(&row.value).map_err(|_| {
            StorageError::Corrupt(format!(
                "quote_series id {}: invalid value '{}'",
                row.id, row.value
            ))
        })?;
        Ok(SeriesEntry::new(row.date, value))
    }
}
