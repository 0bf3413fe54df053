//! Cotizaciones Market Data Crate
//!
//! Fetches today's value of the Argentine daily quotes from their upstream
//! sites.
//!
//! # Overview
//!
//! - [`QuoteType`] - The three tracked series: UVA, dólar mayorista, dólar MEP
//! - [`SiteAdapter`] - One adapter per quote type, each scraping one site
//! - [`AdapterRegistry`] - Dispatch, retry with backoff, value validation
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |  AdapterRegistry | --> |   SiteAdapter    | --> |  upstream site   |
//! |  retry/validate  |     | (ikiwi, dolarhoy,|     |  (JSON or HTML)  |
//! +------------------+     |  investing)      |     +------------------+
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::{MarketDataError, RetryClass};
pub use models::{argentina_now, argentina_today, ParseQuoteTypeError, QuoteType, ARGENTINA_TZ};
pub use provider::{
    parse_price, DolarHoyMepAdapter, IkiwiUvaAdapter, InvestingMayoristaAdapter, SiteAdapter,
};
pub use registry::{AdapterRegistry, RetryPolicy};
