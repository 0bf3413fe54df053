//! Copying series from one store into another.
//!
//! Used to move the legacy flat files into the database. Only days missing
//! from the target are written, so running it twice is harmless.

use log::{info, warn};
use std::collections::BTreeMap;

use super::dates::parse_quote_date;
use super::model::QuoteType;
use super::store::SeriesStore;
use crate::errors::Result;

/// Copies every series in `source` into `target` without overwriting.
///
/// Returns the number of rows written per quote type. Source rows with an
/// unrecognized date are skipped with a warning.
pub async fn migrate_series(
    source: &dyn SeriesStore,
    target: &dyn SeriesStore,
) -> Result<BTreeMap<QuoteType, usize>> {
    let mut written = BTreeMap::new();

    for quote_type in QuoteType::ALL {
        let entries = source.read(quote_type).await?;
        let mut points = Vec::with_capacity(entries.len());
        for entry in &entries {
            match parse_quote_date(&entry.date) {
                Ok(date) => points.push((date, entry.value)),
                Err(e) => warn!("Skipping {} row during migration: {}", quote_type, e),
            }
        }

        let count = target.insert_missing(quote_type, &points).await?;
        info!(
            "Migrated {}: {} new rows from {} ({} read)",
            quote_type,
            count,
            source.backend(),
            entries.len()
        );
        written.insert(quote_type, count);
    }

    Ok(written)
}
