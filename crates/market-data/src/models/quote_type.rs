use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three daily series tracked by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteType {
    /// Unidad de Valor Adquisitivo, the inflation-adjustment unit.
    Uva,
    /// Wholesale (BCRA A3500) dollar rate.
    DolarMayorista,
    /// MEP ("bolsa") dollar rate.
    DolarMep,
}

impl QuoteType {
    pub const ALL: [QuoteType; 3] = [
        QuoteType::Uva,
        QuoteType::DolarMayorista,
        QuoteType::DolarMep,
    ];

    /// Storage key, used as CSV file stem and SQL discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteType::Uva => "uva",
            QuoteType::DolarMayorista => "dolar_mayorista",
            QuoteType::DolarMep => "dolar_mep",
        }
    }

    /// URL path segment.
    pub fn slug(&self) -> &'static str {
        match self {
            QuoteType::Uva => "uva",
            QuoteType::DolarMayorista => "dolar-mayorista",
            QuoteType::DolarMep => "dolar-mep",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuoteType::Uva => "UVA",
            QuoteType::DolarMayorista => "Dólar Mayorista",
            QuoteType::DolarMep => "Dólar MEP",
        }
    }
}

impl fmt::Display for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown quote type: {0}")]
pub struct ParseQuoteTypeError(pub String);

/// Accepts both the storage key and the URL slug.
impl FromStr for QuoteType {
    type Err = ParseQuoteTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uva" => Ok(QuoteType::Uva),
            "dolar_mayorista" | "dolar-mayorista" => Ok(QuoteType::DolarMayorista),
            "dolar_mep" | "dolar-mep" => Ok(QuoteType::DolarMep),
            other => Err(ParseQuoteTypeError(other.to_string())),
        }
    }
}
