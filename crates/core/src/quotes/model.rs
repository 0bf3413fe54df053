use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dates::format_canonical;

pub use cotizaciones_market_data::QuoteType;

/// One day's value of one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePoint {
    pub quote_type: QuoteType,
    pub date: NaiveDate,
    pub value: Decimal,
}

impl QuotePoint {
    pub fn new(quote_type: QuoteType, date: NaiveDate, value: Decimal) -> Self {
        Self {
            quote_type,
            date,
            value,
        }
    }
}

/// A record as read back from a store.
///
/// `date` is kept exactly as persisted; legacy rows may carry `DD-MM-YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub date: String,
    pub value: Decimal,
}

impl SeriesEntry {
    pub fn new(date: impl Into<String>, value: Decimal) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

impl From<&QuotePoint> for SeriesEntry {
    fn from(point: &QuotePoint) -> Self {
        Self::new(format_canonical(point.date), point.value)
    }
}

/// An element of the served series: a real record or a projected placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: Decimal,
    #[serde(skip)]
    pub projected: bool,
}

impl SeriesPoint {
    pub fn projected(date: String, value: Decimal) -> Self {
        Self {
            date,
            value,
            projected: true,
        }
    }
}

impl From<SeriesEntry> for SeriesPoint {
    fn from(entry: SeriesEntry) -> Self {
        Self {
            date: entry.date,
            value: entry.value,
            projected: false,
        }
    }
}
