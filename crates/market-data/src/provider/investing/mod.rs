//! Dólar mayorista adapter that scrapes the USD/ARS page on investing.com.
//!
//! investing.com blocks most non-browser clients, so when a ScraperAPI key is
//! configured the request is routed through that proxy with a longer timeout.

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use crate::errors::MarketDataError;
use crate::models::QuoteType;
use crate::provider::http::{build_client, fetch_text, PROXY_REQUEST_TIMEOUT, REQUEST_TIMEOUT};
use crate::provider::price::parse_price;
use crate::provider::SiteAdapter;

const PAGE_URL: &str = "https://es.investing.com/currencies/usd-ars";
const SCRAPER_API_URL: &str = "https://api.scraperapi.com/";
const PROVIDER_ID: &str = "INVESTING";

lazy_static! {
    static ref LAST_PRICE: Selector =
        Selector::parse(r#"div[data-test="instrument-price-last"]"#).unwrap();
}

/// How the page is requested.
enum Route {
    Direct { url: String },
    Proxy { endpoint: String, api_key: String, target: String },
}

/// Fetches the wholesale (mayorista) USD/ARS rate.
pub struct InvestingMayoristaAdapter {
    client: Client,
    route: Route,
}

impl InvestingMayoristaAdapter {
    /// Builds the adapter, routing through ScraperAPI when `scraper_api_key` is set.
    pub fn new(scraper_api_key: Option<String>) -> Result<Self, MarketDataError> {
        match scraper_api_key.filter(|key| !key.trim().is_empty()) {
            Some(api_key) => Self::via_proxy(SCRAPER_API_URL, api_key, PAGE_URL),
            None => Self::direct(PAGE_URL),
        }
    }

    pub fn direct(url: impl Into<String>) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            route: Route::Direct { url: url.into() },
        })
    }

    pub fn via_proxy(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(PROXY_REQUEST_TIMEOUT)?,
            route: Route::Proxy {
                endpoint: endpoint.into(),
                api_key: api_key.into(),
                target: target.into(),
            },
        })
    }

    /// Whether requests go through the scraping proxy.
    pub fn uses_proxy(&self) -> bool {
        matches!(self.route, Route::Proxy { .. })
    }

    /// Extracts the last traded price from the page HTML.
    pub fn parse_last_price(html: &str) -> Result<Decimal, MarketDataError> {
        let document = Html::parse_document(html);
        let raw = document
            .select(&LAST_PRICE)
            .next()
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| MarketDataError::ValueNotFound {
                provider: PROVIDER_ID.to_string(),
                message: "instrument-price-last element not found".to_string(),
            })?;

        parse_price(&raw)
    }

    async fn fetch_page(&self) -> Result<String, MarketDataError> {
        match &self.route {
            Route::Direct { url } => {
                debug!("Fetching mayorista page from {}", url);
                fetch_text(&self.client, PROVIDER_ID, url, &[]).await
            }
            Route::Proxy {
                endpoint,
                api_key,
                target,
            } => {
                debug!("Fetching mayorista page through ScraperAPI");
                fetch_text(
                    &self.client,
                    PROVIDER_ID,
                    endpoint,
                    &[("api_key", api_key.as_str()), ("url", target.as_str())],
                )
                .await
            }
        }
    }
}

#[async_trait]
impl SiteAdapter for InvestingMayoristaAdapter {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn quote_type(&self) -> QuoteType {
        QuoteType::DolarMayorista
    }

    async fn fetch(&self) -> Result<Decimal, MarketDataError> {
        let body = self.fetch_page().await?;
        Self::parse_last_price(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
        <html><body>
          <div class="instrument-header">
            <div data-test="instrument-price-last">1.066,75</div>
            <span data-test="instrument-price-change">+2,25</span>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_last_price() {
        assert_eq!(
            InvestingMayoristaAdapter::parse_last_price(PAGE).unwrap(),
            dec!(1066.75)
        );
    }

    #[test]
    fn test_parse_last_price_missing() {
        let err = InvestingMayoristaAdapter::parse_last_price("<div></div>").unwrap_err();
        assert!(matches!(err, MarketDataError::ValueNotFound { .. }));
    }

    #[test]
    fn test_blank_key_means_direct() {
        assert!(!InvestingMayoristaAdapter::new(None).unwrap().uses_proxy());
        assert!(!InvestingMayoristaAdapter::new(Some("  ".to_string()))
            .unwrap()
            .uses_proxy());
        assert!(InvestingMayoristaAdapter::new(Some("k".to_string()))
            .unwrap()
            .uses_proxy());
    }

    #[tokio::test]
    async fn test_fetch_through_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("api_key", "secret"))
            .and(query_param("url", PAGE_URL))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let adapter =
            InvestingMayoristaAdapter::via_proxy(format!("{}/", server.uri()), "secret", PAGE_URL)
                .unwrap();
        assert_eq!(adapter.fetch().await.unwrap(), dec!(1066.75));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let adapter = InvestingMayoristaAdapter::direct(server.uri()).unwrap();
        let err = adapter.fetch().await.unwrap_err();
        assert!(matches!(err, MarketDataError::RateLimited { .. }));
    }
}
