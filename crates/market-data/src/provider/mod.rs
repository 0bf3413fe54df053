//! Site adapters for the daily quotes.
//!
//! Each adapter fetches one [`QuoteType`](crate::models::QuoteType) from one
//! upstream site in a single attempt:
//!
//! | Quote type | Adapter | Source |
//! |------------|---------|--------|
//! | `uva` | [`IkiwiUvaAdapter`] | ikiwi JSON API |
//! | `dolar_mayorista` | [`InvestingMayoristaAdapter`] | investing.com (optionally via ScraperAPI) |
//! | `dolar_mep` | [`DolarHoyMepAdapter`] | dolarhoy.com |
//!
//! Retries, backoff and value validation live in the registry.

mod traits;

pub mod dolarhoy;
pub mod http;
pub mod ikiwi;
pub mod investing;
pub mod price;

pub use dolarhoy::DolarHoyMepAdapter;
pub use ikiwi::IkiwiUvaAdapter;
pub use investing::InvestingMayoristaAdapter;
pub use price::parse_price;
pub use traits::SiteAdapter;
