//! Site adapter trait definition.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::QuoteType;

/// Trait for the per-site adapters.
///
/// An adapter knows how to extract today's value for exactly one
/// [`QuoteType`] from one upstream site. It performs a single attempt; retry
/// and validation are applied by the registry.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use cotizaciones_market_data::provider::SiteAdapter;
///
/// struct FixedAdapter;
///
/// #[async_trait]
/// impl SiteAdapter for FixedAdapter {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     fn quote_type(&self) -> QuoteType {
///         QuoteType::Uva
///     }
///
///     async fn fetch(&self) -> Result<Decimal, MarketDataError> {
///         Ok(dec!(1234.56))
///     }
/// }
/// ```
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Unique identifier for this adapter, e.g. "DOLARHOY".
    ///
    /// Used for logging and error messages.
    fn id(&self) -> &'static str;

    /// The series this adapter produces.
    fn quote_type(&self) -> QuoteType;

    /// Fetch today's value from the upstream site.
    async fn fetch(&self) -> Result<Decimal, MarketDataError>;
}
