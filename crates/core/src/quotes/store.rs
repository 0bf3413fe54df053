//! Series storage trait.
//!
//! Abstracts the persistence medium so the projector, orchestrator and HTTP
//! layer work the same over flat CSV files or SQLite.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashSet;

use super::dates::parse_quote_date;
use super::model::{QuoteType, SeriesEntry};
use crate::errors::Result;

/// Persistence for the daily series.
///
/// Implementations must guarantee:
/// - `read` returns entries ascending by calendar date (stable for equal or
///   unparseable dates, unparseable first) and an empty vec when nothing is stored
/// - at most one entry per (quote type, calendar day); an upsert for a day that
///   exists under a legacy date spelling overwrites that entry
/// - dates are written in the canonical `DD-MM-YY` form
/// - writes are serialized and atomic from the caller's perspective
/// - I/O faults surface as errors, never as an empty result
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Short backend name for logs and the status endpoint.
    fn backend(&self) -> &'static str;

    /// Reads the full stored series for `quote_type`.
    async fn read(&self, quote_type: QuoteType) -> Result<Vec<SeriesEntry>>;

    /// Inserts or overwrites the value for `date`.
    async fn upsert(&self, quote_type: QuoteType, date: NaiveDate, value: Decimal) -> Result<()>;

    /// Upserts several points; returns how many were written.
    async fn upsert_many(
        &self,
        quote_type: QuoteType,
        points: &[(NaiveDate, Decimal)],
    ) -> Result<usize> {
        for (date, value) in points {
            self.upsert(quote_type, *date, *value).await?;
        }
        Ok(points.len())
    }

    /// Writes only the points whose day is not stored yet; returns how many were written.
    async fn insert_missing(
        &self,
        quote_type: QuoteType,
        points: &[(NaiveDate, Decimal)],
    ) -> Result<usize> {
        let existing: HashSet<NaiveDate> = self
            .read(quote_type)
            .await?
            .iter()
            .filter_map(|entry| parse_quote_date(&entry.date).ok())
            .collect();

        let missing: Vec<(NaiveDate, Decimal)> = points
            .iter()
            .filter(|(date, _)| !existing.contains(date))
            .copied()
            .collect();

        debug!(
            "{}: {} of {} points not yet stored",
            quote_type,
            missing.len(),
            points.len()
        );
        self.upsert_many(quote_type, &missing).await
    }

    /// The most recent stored entry, if any.
    async fn latest(&self, quote_type: QuoteType) -> Result<Option<SeriesEntry>> {
        Ok(self.read(quote_type).await?.pop())
    }
}
