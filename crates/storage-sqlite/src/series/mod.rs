//! SQLite persistence for the daily series.

mod model;
mod repository;

pub use model::{NewQuoteSeriesDB, QuoteSeriesDB};
pub use repository::SqliteSeriesStore;
