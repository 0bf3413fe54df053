//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum for every site adapter failure
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

use crate::models::QuoteType;

/// Errors that can occur while fetching a quote from an upstream site.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the registry attempts the fetch again.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request to the site timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The adapter whose request timed out
        provider: String,
    },

    /// The site rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The adapter that was rate limited
        provider: String,
    },

    /// The site could not be reached or answered with a server error.
    #[error("Site unreachable: {provider} - {message}")]
    Unreachable {
        /// The adapter that failed to reach its site
        provider: String,
        /// The underlying transport or status message
        message: String,
    },

    /// The site answered, but rejected the request (4xx other than 429).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The adapter that received the error
        provider: String,
        /// The error message or status
        message: String,
    },

    /// The page or JSON document did not have the expected structure.
    #[error("Unexpected response from {provider}: {message}")]
    UnexpectedResponse {
        /// The adapter that failed to parse the response
        provider: String,
        /// What was missing or malformed
        message: String,
    },

    /// The response was well formed but did not contain today's value.
    #[error("Value not found in {provider}: {message}")]
    ValueNotFound {
        /// The adapter that searched for the value
        provider: String,
        /// What was searched for
        message: String,
    },

    /// A price string could not be turned into a number.
    #[error("Invalid price '{0}'")]
    InvalidPrice(String),

    /// Data validation failed (e.g. zero or negative quote).
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// No adapter was registered for the quote type.
    #[error("No adapter registered for {0}")]
    AdapterNotRegistered(QuoteType),

    /// A network error that could not be classified more precisely.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cotizaciones_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "DOLARHOY".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::InvalidPrice("abc".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::Unreachable { .. } => {
                RetryClass::WithBackoff
            }

            Self::Network(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                RetryClass::WithBackoff
            }

            Self::ProviderError { .. }
            | Self::UnexpectedResponse { .. }
            | Self::ValueNotFound { .. }
            | Self::InvalidPrice(_)
            | Self::ValidationFailed { .. }
            | Self::AdapterNotRegistered(_)
            | Self::Network(_) => RetryClass::Never,
        }
    }
}
