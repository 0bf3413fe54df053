//! Cotizaciones server: HTTP API, configuration and the daily update trigger.

pub mod api;
pub mod config;
pub mod error;
pub mod scheduler;
mod main_lib;

pub use main_lib::{build_state, build_state_with, init_tracing, open_store, AppState};
