//! Registry that dispatches fetches to the adapter of each quote type.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::RetryPolicy;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::QuoteType;
use crate::provider::{
    DolarHoyMepAdapter, IkiwiUvaAdapter, InvestingMayoristaAdapter, SiteAdapter,
};

/// Adapter registry for fetching today's quotes.
pub struct AdapterRegistry {
    adapters: HashMap<QuoteType, Arc<dyn SiteAdapter>>,
    retry_policy: RetryPolicy,
}

impl AdapterRegistry {
    /// Create a registry from a list of adapters.
    ///
    /// A later adapter for the same quote type replaces an earlier one.
    pub fn new(adapters: Vec<Arc<dyn SiteAdapter>>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.quote_type(), adapter))
            .collect();
        Self {
            adapters,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Registry wired to the production sites.
    pub fn with_default_adapters(scraper_api_key: Option<String>) -> Result<Self, MarketDataError> {
        Ok(Self::new(vec![
            Arc::new(IkiwiUvaAdapter::new()?),
            Arc::new(InvestingMayoristaAdapter::new(scraper_api_key)?),
            Arc::new(DolarHoyMepAdapter::new()?),
        ]))
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Quote types with a registered adapter, in canonical order.
    pub fn quote_types(&self) -> Vec<QuoteType> {
        QuoteType::ALL
            .iter()
            .copied()
            .filter(|qt| self.adapters.contains_key(qt))
            .collect()
    }

    /// Fetch today's value for `quote_type`.
    ///
    /// Transient failures are retried per the [`RetryPolicy`]; anything else
    /// fails immediately. A successful fetch must yield a positive value.
    pub async fn fetch(&self, quote_type: QuoteType) -> Result<Decimal, MarketDataError> {
        let adapter = self
            .adapters
            .get(&quote_type)
            .ok_or(MarketDataError::AdapterNotRegistered(quote_type))?;

        let mut failed_attempts = 0u32;
        loop {
            debug!(
                "Fetching {} from '{}' (attempt {})",
                quote_type,
                adapter.id(),
                failed_attempts + 1
            );

            let error = match adapter.fetch().await {
                Ok(value) => return Self::validate(quote_type, value),
                Err(e) => e,
            };
            failed_attempts += 1;

            match error.retry_class() {
                RetryClass::Never => {
                    info!(
                        "Terminal error from '{}' for {}: {}, not retrying",
                        adapter.id(),
                        quote_type,
                        error
                    );
                    return Err(error);
                }
                RetryClass::WithBackoff => match self.retry_policy.delay_after(failed_attempts) {
                    Some(delay) => {
                        warn!(
                            "'{}' failed for {}: {}, retrying in {:?}",
                            adapter.id(),
                            quote_type,
                            error,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        warn!(
                            "'{}' failed for {} after {} attempts: {}",
                            adapter.id(),
                            quote_type,
                            failed_attempts,
                            error
                        );
                        return Err(error);
                    }
                },
            }
        }
    }

    fn validate(quote_type: QuoteType, value: Decimal) -> Result<Decimal, MarketDataError> {
        if value <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("{} value must be positive, got {}", quote_type, value),
            });
        }
        Ok(value)
    }
}
