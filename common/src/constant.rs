/// Base URL for Binance spot REST endpoints.
pub const BINANCE_SPOT_API_BASE: &str = "https://api.binance.com";
/// Base URL for Binance USDT-margined futures REST endpoints.
pub const BINANCE_FUTURES_API_BASE: &str = "https://fapi.binance.com";

/// Latest futures price for one symbol.
pub const FUTURES_PRICE_PATH: &str = "/fapi/v1/ticker/price";
/// Premium index; carries `lastFundingRate` per symbol or for the whole venue.
pub const FUTURES_PREMIUM_INDEX_PATH: &str = "/fapi/v1/premiumIndex";
/// Futures instrument universe.
pub const FUTURES_EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
/// Rolling 24h ticker statistics (spot venue).
pub const SPOT_TICKER_24H_PATH: &str = "/api/v3/ticker/24hr";

/// Quote asset used as the ranking-eligibility filter.
pub const QUOTE_ASSET: &str = "USDT";
/// Instrument status accepted as tradable in the futures universe.
pub const TRADING_STATUS: &str = "TRADING";

/// Reference pairs shown first unless disabled on the command line.
pub const DEFAULT_SYMBOLS: [&str; 2] = ["BTCUSDT", "ETHUSDT"];
/// Number of symbols per side in every ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// UTC hours at which Binance settles perpetual funding.
pub const FUNDING_SETTLEMENT_HOURS: [u32; 3] = [0, 8, 16];
/// Hours between two funding settlements.
pub const FUNDING_INTERVAL_HOURS: i64 = 8;

/// Render tick of the polling loop.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
/// Ticks between two ranking refreshes.
pub const DEFAULT_RANKING_EVERY_TICKS: u64 = 500;
/// Ticks between two pair-data refreshes.
pub const DEFAULT_PAIRS_EVERY_TICKS: u64 = 20;

/// Per-call HTTP timeout.
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// Attempts made for a funding-rate call that fails at the connection level.
pub const FUNDING_MAX_ATTEMPTS: usize = 3;
/// Fixed delay between funding-rate attempts.
pub const FUNDING_RETRY_DELAY_MS: u64 = 1_000;
