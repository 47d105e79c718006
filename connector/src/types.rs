use common::Symbol;
use serde::Deserialize;
use serde_json::Value;

/// One symbol with a parsed numeric value (funding percent or 24h change).
#[derive(Clone, Debug, PartialEq)]
pub struct RateEntry {
    pub symbol: Symbol,
    pub value: f64,
}

impl RateEntry {
    pub fn new(symbol: impl Into<Symbol>, value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            value,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ExchangeInfoResponse {
    pub symbols: Vec<UniverseSymbol>,
}

/// Futures instrument as listed by `exchangeInfo`.
#[derive(Clone, Debug, Deserialize)]
pub struct UniverseSymbol {
    pub symbol: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Row of the venue-wide premium index.
#[derive(Deserialize)]
pub(crate) struct PremiumIndexRow {
    pub symbol: String,
    #[serde(rename = "lastFundingRate", default)]
    pub last_funding_rate: Option<Value>,
}

/// Row of the venue-wide 24h ticker statistics.
#[derive(Deserialize)]
pub(crate) struct Ticker24hRow {
    pub symbol: String,
    #[serde(rename = "priceChangePercent", default)]
    pub price_change_percent: Option<Value>,
}
