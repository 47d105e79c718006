mod fanout;
mod ranking;
mod rest;
mod source;
mod types;
mod utils;

use std::time::Duration;

use common::constant::{
    BINANCE_FUTURES_API_BASE, BINANCE_SPOT_API_BASE, FUNDING_MAX_ATTEMPTS,
    FUNDING_RETRY_DELAY_MS, HTTP_TIMEOUT_SECS,
};

pub use fanout::fetch_pair_data;
pub use ranking::{
    fetch_rankings, rank_change_extremes, rank_funding_extremes, top_change_extremes,
    top_funding_extremes,
};
pub use rest::{RestClient, RestError};
pub use source::{MarketDataSource, Universe};
pub use types::{RateEntry, UniverseSymbol};

#[derive(Clone, Debug)]
pub struct ConnectorConfig {
    pub spot_rest_endpoint: String,
    pub futures_rest_endpoint: String,
    pub http_timeout: Duration,
    pub funding_max_attempts: usize,
    pub funding_retry_delay: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            spot_rest_endpoint: BINANCE_SPOT_API_BASE.to_string(),
            futures_rest_endpoint: BINANCE_FUTURES_API_BASE.to_string(),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            funding_max_attempts: FUNDING_MAX_ATTEMPTS,
            funding_retry_delay: Duration::from_millis(FUNDING_RETRY_DELAY_MS),
        }
    }
}

impl ConnectorConfig {
    /// Points both venues at the same base URL (mock servers, proxies).
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            spot_rest_endpoint: base.clone(),
            futures_rest_endpoint: base,
            ..Self::default()
        }
    }

    pub fn with_funding_retry_delay(mut self, delay: Duration) -> Self {
        self.funding_retry_delay = delay;
        self
    }
}
