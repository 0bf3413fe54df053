//! Shared HTTP plumbing for the site adapters.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::{Client, StatusCode};

use crate::errors::MarketDataError;

/// Default HTTP request timeout for direct site requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for requests routed through the scraping proxy, which renders the page first.
pub const PROXY_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("es-AR,es;q=0.8,en-US;q=0.5,en;q=0.3"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

/// Builds a client that presents itself as a desktop browser.
///
/// Some of the scraped sites serve a bot wall to unknown user agents.
pub fn build_client(timeout: Duration) -> Result<Client, MarketDataError> {
    Client::builder()
        .timeout(timeout)
        .default_headers(browser_headers())
        .build()
        .map_err(MarketDataError::Network)
}

/// Maps a transport error onto the adapter error taxonomy.
pub fn map_request_error(provider: &str, err: reqwest::Error) -> MarketDataError {
    if err.is_timeout() {
        MarketDataError::Timeout {
            provider: provider.to_string(),
        }
    } else if err.is_connect() || err.is_request() {
        MarketDataError::Unreachable {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    } else {
        MarketDataError::Network(err)
    }
}

/// Maps a non-success status onto the adapter error taxonomy.
pub fn map_status(provider: &str, status: StatusCode) -> MarketDataError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        MarketDataError::RateLimited {
            provider: provider.to_string(),
        }
    } else if status.is_server_error() {
        MarketDataError::Unreachable {
            provider: provider.to_string(),
            message: status.to_string(),
        }
    } else {
        MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: status.to_string(),
        }
    }
}

/// GETs `url` (with optional query parameters) and returns the body as text.
pub async fn fetch_text(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, MarketDataError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| map_request_error(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(map_status(provider, status));
    }

    response
        .text()
        .await
        .map_err(|e| map_request_error(provider, e))
}
