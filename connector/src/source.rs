use std::collections::HashSet;

use async_trait::async_trait;
use common::Symbol;

use crate::{RateEntry, RestError};

/// Symbols currently tradable as USDT-margined perpetuals.
pub type Universe = HashSet<Symbol>;

/// Read-only market data the monitor needs from a venue.
///
/// Single-symbol reads never fail: a missing, malformed or unreachable value
/// comes back as `None`. Venue-wide reads feed the rankings and surface errors
/// so the caller can keep its previous result.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Option<String>;

    /// Funding rate in percent.
    async fn fetch_funding_rate(&self, symbol: &str) -> Option<f64>;

    async fn fetch_24h_change(&self, symbol: &str) -> Option<f64>;

    async fn fetch_universe(&self) -> Result<Universe, RestError>;

    /// Funding rate in percent for every listed symbol, in venue order.
    async fn fetch_all_funding_rates(&self) -> Result<Vec<RateEntry>, RestError>;

    /// 24h change in percent for every symbol, in venue order.
    async fn fetch_all_24h_changes(&self) -> Result<Vec<RateEntry>, RestError>;
}
