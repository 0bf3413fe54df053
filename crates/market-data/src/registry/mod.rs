//! Adapter registry module.
//!
//! Maps each quote type to its site adapter and applies:
//! - Retry with exponential backoff for transient failures
//! - Validation of the fetched value

mod adapter_registry;
mod backoff;

pub use adapter_registry::AdapterRegistry;
pub use backoff::RetryPolicy;
