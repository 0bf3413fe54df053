//! UVA adapter backed by the ikiwi public API.
//!
//! The endpoint returns the full published UVA table as a JSON array:
//!
//! ```text
//! [{"fecha": "18-10-2026", "valor": 1734.21}, ...]
//! ```
//!
//! Only the entry for today's date in Argentina is used.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::errors::MarketDataError;
use crate::models::{argentina_today, QuoteType};
use crate::provider::http::{build_client, fetch_text, REQUEST_TIMEOUT};
use crate::provider::price::parse_price;
use crate::provider::SiteAdapter;

const BASE_URL: &str = "https://prestamos.ikiwi.net.ar";
const VALUES_PATH: &str = "/api/v1/engine/uva/valores/";
const PROVIDER_ID: &str = "IKIWI";

/// Date format used in the `fecha` field.
const IKIWI_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Deserialize)]
struct UvaEntry {
    fecha: String,
    valor: Value,
}

/// Fetches the daily UVA value.
pub struct IkiwiUvaAdapter {
    client: Client,
    base_url: String,
}

impl IkiwiUvaAdapter {
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_base_url(BASE_URL)
    }

    /// Points the adapter at a different host. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the table and extracts the value published for `date`.
    pub async fn fetch_for(&self, date: NaiveDate) -> Result<Decimal, MarketDataError> {
        let url = format!("{}{}", self.base_url, VALUES_PATH);
        debug!("Fetching UVA table from {}", url);

        let body = fetch_text(&self.client, PROVIDER_ID, &url, &[]).await?;
        Self::value_for_date(&body, date)
    }

    /// Extracts the value for `date` from a raw response body.
    pub fn value_for_date(body: &str, date: NaiveDate) -> Result<Decimal, MarketDataError> {
        let entries: Vec<UvaEntry> =
            serde_json::from_str(body).map_err(|e| MarketDataError::UnexpectedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("invalid UVA table: {}", e),
            })?;

        let wanted = date.format(IKIWI_DATE_FORMAT).to_string();
        let entry = entries
            .into_iter()
            .find(|entry| entry.fecha.trim() == wanted)
            .ok_or_else(|| MarketDataError::ValueNotFound {
                provider: PROVIDER_ID.to_string(),
                message: format!("no UVA value for {}", wanted),
            })?;

        Self::parse_valor(&entry.valor)
    }

    fn parse_valor(valor: &Value) -> Result<Decimal, MarketDataError> {
        match valor {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .map(|d| d.round_dp(2))
                .map_err(|_| MarketDataError::InvalidPrice(n.to_string())),
            Value::String(s) => parse_price(s),
            other => Err(MarketDataError::UnexpectedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("unexpected valor: {}", other),
            }),
        }
    }
}

#[async_trait]
impl SiteAdapter for IkiwiUvaAdapter {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn quote_type(&self) -> QuoteType {
        QuoteType::Uva
    }

    async fn fetch(&self) -> Result<Decimal, MarketDataError> {
        self.fetch_for(argentina_today()).await
    }
}
