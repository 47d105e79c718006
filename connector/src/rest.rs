use async_trait::async_trait;
use common::constant::{
    FUTURES_EXCHANGE_INFO_PATH, FUTURES_PREMIUM_INDEX_PATH, FUTURES_PRICE_PATH,
    SPOT_TICKER_24H_PATH, TRADING_STATUS,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::types::{ExchangeInfoResponse, PremiumIndexRow, Ticker24hRow};
use crate::utils::{parse_f64, price_text, truncate_payload};
use crate::{ConnectorConfig, MarketDataSource, RateEntry, Universe};

const ERROR_BODY_MAX_LEN: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("unexpected response: {0}")]
    InvalidPayload(&'static str),
}

/// Unauthenticated Binance REST client. Cheap to share by reference; the
/// underlying connection pool is reused across every call.
pub struct RestClient {
    http: Client,
    spot_endpoint: String,
    futures_endpoint: String,
    funding_max_attempts: usize,
    funding_retry_delay: std::time::Duration,
}

impl RestClient {
    pub fn from_config(cfg: &ConnectorConfig) -> Result<Self, RestError> {
        let http = Client::builder()
            .user_agent("funding-monitor-binance-connector")
            .timeout(cfg.http_timeout)
            .build()?;
        Ok(Self {
            http,
            spot_endpoint: cfg.spot_rest_endpoint.trim_end_matches('/').to_string(),
            futures_endpoint: cfg.futures_rest_endpoint.trim_end_matches('/').to_string(),
            funding_max_attempts: cfg.funding_max_attempts.max(1),
            funding_retry_delay: cfg.funding_retry_delay,
        })
    }

    pub fn new() -> Result<Self, RestError> {
        Self::from_config(&ConnectorConfig::default())
    }

    /// Last futures price as the venue formats it.
    pub async fn fetch_price(&self, symbol: &str) -> Option<String> {
        let url = format!("{}{}", self.futures_endpoint, FUTURES_PRICE_PATH);
        let body = match self.get_value(&url, symbol).await {
            Ok(body) => body,
            Err(err) => {
                warn!(?err, symbol, "failed to fetch price");
                return None;
            }
        };
        let price = body.get("price").and_then(price_text);
        if price.is_none() {
            debug!(symbol, "price missing from ticker response");
        }
        price
    }

    /// Last funding rate in percent.
    ///
    /// Connection-level failures are retried with a fixed delay; anything else
    /// gives up straight away.
    pub async fn fetch_funding_rate(&self, symbol: &str) -> Option<f64> {
        let url = format!("{}{}", self.futures_endpoint, FUTURES_PREMIUM_INDEX_PATH);
        for attempt in 1..=self.funding_max_attempts {
            match self.get_value(&url, symbol).await {
                Ok(body) => {
                    let rate = body.get("lastFundingRate").and_then(parse_f64);
                    if rate.is_none() {
                        debug!(symbol, "lastFundingRate missing from premium index");
                    }
                    return rate.map(|rate| rate * 100.0);
                }
                Err(RestError::Http(err)) if err.is_connect() => {
                    warn!(
                        ?err,
                        symbol,
                        attempt,
                        max_attempts = self.funding_max_attempts,
                        "funding rate connection failed"
                    );
                    if attempt < self.funding_max_attempts {
                        sleep(self.funding_retry_delay).await;
                    }
                }
                Err(err) => {
                    warn!(?err, symbol, "failed to fetch funding rate");
                    return None;
                }
            }
        }
        warn!(symbol, "funding rate retries exhausted");
        None
    }

    /// Spot 24h price change in percent.
    pub async fn fetch_24h_change(&self, symbol: &str) -> Option<f64> {
        let url = format!("{}{}", self.spot_endpoint, SPOT_TICKER_24H_PATH);
        let body = match self.get_value(&url, symbol).await {
            Ok(body) => body,
            Err(err) => {
                warn!(?err, symbol, "failed to fetch 24h change");
                return None;
            }
        };
        let change = body.get("priceChangePercent").and_then(parse_f64);
        if change.is_none() {
            debug!(symbol, "priceChangePercent missing or malformed");
        }
        change
    }

    /// Futures symbols whose status is `TRADING` (or unspecified).
    pub async fn fetch_universe(&self) -> Result<Universe, RestError> {
        let url = format!("{}{}", self.futures_endpoint, FUTURES_EXCHANGE_INFO_PATH);
        let info: ExchangeInfoResponse = self.get_json(&url).await?;
        let universe: Universe = info
            .symbols
            .into_iter()
            .filter(|entry| {
                entry
                    .status
                    .as_deref()
                    .map_or(true, |status| status == TRADING_STATUS)
            })
            .map(|entry| entry.symbol)
            .collect();
        if universe.is_empty() {
            return Err(RestError::InvalidPayload("empty exchange info"));
        }
        Ok(universe)
    }

    pub async fn fetch_all_funding_rates(&self) -> Result<Vec<RateEntry>, RestError> {
        let url = format!("{}{}", self.futures_endpoint, FUTURES_PREMIUM_INDEX_PATH);
        let rows: Vec<PremiumIndexRow> = self.get_json(&url).await?;
        let total = rows.len();
        let entries: Vec<RateEntry> = rows
            .into_iter()
            .filter_map(|row| {
                let rate = row.last_funding_rate.as_ref().and_then(parse_f64)?;
                Some(RateEntry::new(row.symbol, rate * 100.0))
            })
            .collect();
        if entries.len() < total {
            debug!(
                total,
                parsed = entries.len(),
                "skipped premium index rows without a funding rate"
            );
        }
        Ok(entries)
    }

    pub async fn fetch_all_24h_changes(&self) -> Result<Vec<RateEntry>, RestError> {
        let url = format!("{}{}", self.spot_endpoint, SPOT_TICKER_24H_PATH);
        let rows: Vec<Ticker24hRow> = self.get_json(&url).await?;
        let total = rows.len();
        let entries: Vec<RateEntry> = rows
            .into_iter()
            .filter_map(|row| {
                let change = row.price_change_percent.as_ref().and_then(parse_f64)?;
                Some(RateEntry::new(row.symbol, change))
            })
            .collect();
        if entries.len() < total {
            debug!(
                total,
                parsed = entries.len(),
                "skipped 24h tickers without a numeric change"
            );
        }
        Ok(entries)
    }

    /// Per-symbol query. The body is decoded even on error statuses because
    /// the venue reports unknown symbols as a JSON object without the field.
    async fn get_value(&self, url: &str, symbol: &str) -> Result<Value, RestError> {
        let resp = self
            .http
            .get(url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let status = resp.status();
        let payload = resp.text().await?;
        match serde_json::from_str::<Value>(&payload) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(RestError::HttpStatus {
                code: status.as_u16(),
                body: truncate_payload(&payload, ERROR_BODY_MAX_LEN),
            }),
            Err(_) => Err(RestError::InvalidPayload("decode ticker")),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RestError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let payload = resp.text().await?;
        if !status.is_success() {
            return Err(RestError::HttpStatus {
                code: status.as_u16(),
                body: truncate_payload(&payload, ERROR_BODY_MAX_LEN),
            });
        }
        serde_json::from_str(&payload).map_err(|err| {
            warn!(
                ?err,
                endpoint = url,
                payload = %truncate_payload(&payload, ERROR_BODY_MAX_LEN),
                "failed to decode response"
            );
            RestError::InvalidPayload("decode response")
        })
    }
}

#[async_trait]
impl MarketDataSource for RestClient {
    async fn fetch_price(&self, symbol: &str) -> Option<String> {
        RestClient::fetch_price(self, symbol).await
    }

    async fn fetch_funding_rate(&self, symbol: &str) -> Option<f64> {
        RestClient::fetch_funding_rate(self, symbol).await
    }

    async fn fetch_24h_change(&self, symbol: &str) -> Option<f64> {
        RestClient::fetch_24h_change(self, symbol).await
    }

    async fn fetch_universe(&self) -> Result<Universe, RestError> {
        RestClient::fetch_universe(self).await
    }

    async fn fetch_all_funding_rates(&self) -> Result<Vec<RateEntry>, RestError> {
        RestClient::fetch_all_funding_rates(self).await
    }

    async fn fetch_all_24h_changes(&self) -> Result<Vec<RateEntry>, RestError> {
        RestClient::fetch_all_24h_changes(self).await
    }
}
