//! Dólar MEP adapter that scrapes the dolarhoy.com landing page.
//!
//! The page renders one tile per exchange rate. The MEP tile is the one whose
//! title link mentions "MEP"; its selling price is the value we keep.

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::errors::MarketDataError;
use crate::models::QuoteType;
use crate::provider::http::{build_client, fetch_text, REQUEST_TIMEOUT};
use crate::provider::price::parse_price;
use crate::provider::SiteAdapter;

const BASE_URL: &str = "https://www.dolarhoy.com/";
const PROVIDER_ID: &str = "DOLARHOY";

lazy_static! {
    static ref TILE: Selector = Selector::parse("div.tile.is-child").unwrap();
    static ref TITLE: Selector = Selector::parse("a.titleText").unwrap();
    static ref SELL_VALUE: Selector = Selector::parse("div.values div.venta div.val").unwrap();
}

/// Fetches the Dólar MEP selling price.
pub struct DolarHoyMepAdapter {
    client: Client,
    url: String,
}

impl DolarHoyMepAdapter {
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_url(BASE_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            url: url.into(),
        })
    }

    /// Extracts the MEP selling price from the page HTML.
    pub fn parse_mep(html: &str) -> Result<Decimal, MarketDataError> {
        let document = Html::parse_document(html);

        let tile = document
            .select(&TILE)
            .find(|tile| Self::is_mep_tile(tile))
            .ok_or_else(|| MarketDataError::ValueNotFound {
                provider: PROVIDER_ID.to_string(),
                message: "no MEP tile on page".to_string(),
            })?;

        let raw = tile
            .select(&SELL_VALUE)
            .next()
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| MarketDataError::UnexpectedResponse {
                provider: PROVIDER_ID.to_string(),
                message: "MEP tile has no selling value".to_string(),
            })?;

        parse_price(&raw)
    }

    fn is_mep_tile(tile: &ElementRef<'_>) -> bool {
        tile.select(&TITLE)
            .any(|title| title.text().collect::<String>().contains("MEP"))
    }
}

#[async_trait]
impl SiteAdapter for DolarHoyMepAdapter {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn quote_type(&self) -> QuoteType {
        QuoteType::DolarMep
    }

    async fn fetch(&self) -> Result<Decimal, MarketDataError> {
        debug!("Fetching MEP page from {}", self.url);
        let body = fetch_text(&self.client, PROVIDER_ID, &self.url, &[]).await?;
        Self::parse_mep(&body)
    }
}
