//! Market data models
//!
//! - `quote_type` - The three tracked series (QuoteType) and their identifiers
//! - `market_time` - The Argentine market timezone and "today" helpers

mod market_time;
mod quote_type;

pub use market_time::{argentina_now, argentina_today, ARGENTINA_TZ};
pub use quote_type::{ParseQuoteTypeError, QuoteType};
