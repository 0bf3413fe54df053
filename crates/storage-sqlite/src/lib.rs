//! SQLite storage for the daily quotes.
//!
//! Implements the `SeriesStore` trait from `cotizaciones-core` on top of a
//! single `quote_series` table, using Diesel with an r2d2 pool for reads and a
//! single writer actor for all writes.
//!
//! ```text
//! core (SeriesStore)
//!         │
//!         ▼
//! storage-sqlite (this crate) ──> SQLite DB (WAL)
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod series;

pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle};
pub use errors::{IntoCore, SqliteError};
pub use series::SqliteSeriesStore;
