//! Quote series module.
//!
//! - [`model`] - Series records as stored and as served
//! - [`dates`] - Parsing and canonical formatting of series dates
//! - [`store`] - The `SeriesStore` persistence trait
//! - [`projector`] - Forward projection of a series with placeholder days
//! - [`import`] - CSV import validation and ingestion
//! - [`migrate`] - Copying series between stores
//!
//! ```text
//! HTTP read ──> SeriesStore::read ──> SeriesProjector::project ──> JSON
//! ```

pub mod dates;
pub mod import;
pub mod migrate;
pub mod model;
pub mod projector;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use dates::{
    format_canonical, normalize_date, parse_quote_date, sort_entries_by_date, LONG_DATE_FORMAT,
};
pub use model::{QuotePoint, QuoteType, SeriesEntry, SeriesPoint};
pub use projector::{project, SeriesProjector};
pub use store::SeriesStore;
