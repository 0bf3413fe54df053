//! Cotizaciones Core - Domain types, series logic and update orchestration.
//!
//! This crate is storage-agnostic: it defines the [`SeriesStore`] trait that
//! the `storage-sqlite` and `storage-csv` crates implement.

pub mod errors;
pub mod quotes;
pub mod update;

pub use quotes::{QuotePoint, QuoteType, SeriesEntry, SeriesPoint, SeriesProjector, SeriesStore};
pub use update::{DailySchedule, HealthReport, UpdateOrchestrator, UpdateReport};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
