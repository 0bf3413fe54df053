//! Daily update of the stored series.
//!
//! - [`orchestrator`] - Fetches today's values and upserts them, one quote type at a time
//! - [`model`] - Update and health reports
//! - [`schedule`] - The daily fire time and next-run computation

pub mod model;
pub mod orchestrator;
pub mod schedule;

pub use model::{HealthReport, HealthStatus, QuoteUpdateOutcome, SourceStatus, UpdateReport, UpdateStatus};
pub use orchestrator::UpdateOrchestrator;
pub use schedule::{DailySchedule, UPDATE_JOB_ID};
