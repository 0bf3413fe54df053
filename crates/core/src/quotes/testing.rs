//! In-memory store used by the unit tests of this crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::dates::{format_canonical, parse_quote_date, sort_entries_by_date};
use super::model::{QuoteType, SeriesEntry};
use super::store::SeriesStore;
use crate::errors::{Result, StorageError};

#[derive(Clone, Default)]
pub(crate) struct MockSeriesStore {
    series: Arc<Mutex<HashMap<QuoteType, Vec<SeriesEntry>>>>,
    fail_writes_for: Arc<Mutex<Option<QuoteType>>>,
}

impl MockSeriesStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_entries(quote_type: QuoteType, entries: Vec<SeriesEntry>) -> Self {
        let store = Self::new();
        store.series.lock().unwrap().insert(quote_type, entries);
        store
    }

    pub(crate) fn fail_writes_for(&self, quote_type: QuoteType) {
        *self.fail_writes_for.lock().unwrap() = Some(quote_type);
    }

    pub(crate) fn entries(&self, quote_type: QuoteType) -> Vec<SeriesEntry> {
        self.series
            .lock()
            .unwrap()
            .get(&quote_type)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SeriesStore for MockSeriesStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, quote_type: QuoteType) -> Result<Vec<SeriesEntry>> {
        let mut entries = self.entries(quote_type);
        sort_entries_by_date(&mut entries);
        Ok(entries)
    }

    async fn upsert(&self, quote_type: QuoteType, date: NaiveDate, value: Decimal) -> Result<()> {
        if *self.fail_writes_for.lock().unwrap() == Some(quote_type) {
            return Err(StorageError::Io("Intentional write failure".into()).into());
        }
        let mut series = self.series.lock().unwrap();
        let entries = series.entry(quote_type).or_default();
        entries.retain(|e| parse_quote_date(&e.date).ok() != Some(date));
        entries.push(SeriesEntry::new(format_canonical(date), value));
        Ok(())
    }
}
