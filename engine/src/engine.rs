pub mod display;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use common::{
    constant::{
        DEFAULT_PAIRS_EVERY_TICKS, DEFAULT_RANKING_EVERY_TICKS, DEFAULT_TICK_INTERVAL_MS,
        DEFAULT_TOP_N,
    },
    now_utc, PairData, Rankings, Symbol,
};
use connector::{fetch_pair_data, fetch_rankings, ConnectorConfig, MarketDataSource, RestClient};
use tokio::signal;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use utils::time::{format_countdown, funding_countdown};

use crate::display::Renderer;

/// Runtime switches picked up by the thin CLI.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// User pairs, already normalised and ordered for display.
    pub pairs: Vec<Symbol>,
    /// Symbols per side in each ranking.
    pub top_n: usize,
    pub tick_interval: Duration,
    pub ranking_every_ticks: u64,
    pub pairs_every_ticks: u64,
    pub connector: ConnectorConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            top_n: DEFAULT_TOP_N,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            ranking_every_ticks: DEFAULT_RANKING_EVERY_TICKS,
            pairs_every_ticks: DEFAULT_PAIRS_EVERY_TICKS,
            connector: ConnectorConfig::default(),
        }
    }
}

/// Which refreshes fire on a given tick. Rendering happens on every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    ranking_every: u64,
    pairs_every: u64,
}

impl Cadence {
    pub fn new(ranking_every: u64, pairs_every: u64) -> Self {
        Self {
            ranking_every: ranking_every.max(1),
            pairs_every: pairs_every.max(1),
        }
    }

    pub fn ranking_due(&self, tick: u64) -> bool {
        tick % self.ranking_every == 0
    }

    pub fn pairs_due(&self, tick: u64) -> bool {
        tick % self.pairs_every == 0
    }
}

/// State cells owned by the loop. Each refresh replaces its own cell; the
/// renderer only ever reads the last value written.
#[derive(Clone, Debug, Default)]
pub struct MonitorState {
    pub rankings: Rankings,
    pub pair_data: Option<PairData>,
}

pub struct Monitor<S> {
    source: S,
    pairs: Vec<Symbol>,
    top_n: usize,
    cadence: Cadence,
    state: MonitorState,
    renderer: Renderer,
}

impl<S: MarketDataSource> Monitor<S> {
    pub fn new(source: S, opts: &EngineOptions) -> Self {
        Self {
            source,
            pairs: opts.pairs.clone(),
            top_n: opts.top_n,
            cadence: Cadence::new(opts.ranking_every_ticks, opts.pairs_every_ticks),
            state: MonitorState::default(),
            renderer: Renderer::new(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// One loop iteration: due refreshes in ranking -> pairs order, then a redraw.
    pub async fn step<W: Write>(
        &mut self,
        tick: u64,
        now: DateTime<Utc>,
        out: &mut W,
    ) -> io::Result<()> {
        if self.cadence.ranking_due(tick) {
            self.refresh_rankings().await;
        }
        if self.cadence.pairs_due(tick) {
            self.refresh_pairs().await;
        }
        let countdown = format_countdown(funding_countdown(now));
        self.renderer
            .draw(out, self.state.pair_data.as_ref(), &countdown)
    }

    pub async fn refresh_rankings(&mut self) {
        let started = Instant::now();
        match fetch_rankings(&self.source, self.top_n, &self.state.rankings).await {
            Ok(rankings) => {
                self.state.rankings = rankings;
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "rankings refreshed"
                );
            }
            Err(err) => warn!(?err, "ranking refresh failed, keeping previous rankings"),
        }
    }

    pub async fn refresh_pairs(&mut self) {
        let started = Instant::now();
        let groups = self.state.rankings.groups_with(&self.pairs);
        let data = fetch_pair_data(&self.source, &groups).await;
        debug!(
            distinct = data.distinct_pairs,
            duplicates = data.duplicate_pairs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pair data refreshed"
        );
        self.state.pair_data = Some(data);
    }

    async fn tick<W: Write>(
        &mut self,
        ticker: &mut Interval,
        tick: u64,
        out: &mut W,
    ) -> io::Result<()> {
        ticker.tick().await;
        self.step(tick, now_utc(), out).await
    }
}

/// Polls until Ctrl-C. An in-flight refresh is dropped on interrupt; nothing
/// needs to be flushed.
pub async fn run(opts: EngineOptions) -> Result<()> {
    let client = RestClient::from_config(&opts.connector)?;
    info!(
        pairs = ?opts.pairs,
        top_n = opts.top_n,
        tick_ms = opts.tick_interval.as_millis() as u64,
        "monitor starting"
    );
    let mut monitor = Monitor::new(client, &opts);
    let mut ticker = interval(opts.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut stdout = io::stdout();
    monitor.renderer.begin(&mut stdout)?;
    let mut tick = 0u64;
    loop {
        tokio::select! {
            biased;
            res = &mut shutdown => {
                if let Err(err) = res {
                    warn!(?err, "failed to listen for interrupt");
                }
                break;
            }
            res = monitor.tick(&mut ticker, tick, &mut stdout) => {
                res?;
                tick = tick.wrapping_add(1);
            }
        }
    }
    monitor.renderer.finish(&mut stdout)?;
    info!(ticks = tick, "monitor stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use common::PairGroup;
    use connector::{RateEntry, RestError, Universe};

    use super::*;

    #[derive(Default)]
    struct FakeSource {
        universe_down: AtomicBool,
        universe_calls: AtomicUsize,
        price_calls: AtomicUsize,
        changes: HashMap<String, f64>,
    }

    impl FakeSource {
        fn listed() -> Self {
            let changes = [
                ("BTCUSDT", 1.0),
                ("ETHUSDT", -2.0),
                ("SOLUSDT", 8.0),
                ("DOGEUSDT", -9.0),
            ]
            .into_iter()
            .map(|(s, v)| (s.to_string(), v))
            .collect();
            Self {
                changes,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn fetch_price(&self, _symbol: &str) -> Option<String> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            Some("1.0".to_string())
        }

        async fn fetch_funding_rate(&self, _symbol: &str) -> Option<f64> {
            Some(0.01)
        }

        async fn fetch_24h_change(&self, symbol: &str) -> Option<f64> {
            self.changes.get(symbol).copied()
        }

        async fn fetch_universe(&self) -> Result<Universe, RestError> {
            self.universe_calls.fetch_add(1, Ordering::SeqCst);
            if self.universe_down.load(Ordering::SeqCst) {
                return Err(RestError::InvalidPayload("down"));
            }
            Ok(self.changes.keys().cloned().collect())
        }

        async fn fetch_all_funding_rates(&self) -> Result<Vec<RateEntry>, RestError> {
            Ok(vec![
                RateEntry::new("BTCUSDT", 0.01),
                RateEntry::new("ETHUSDT", 0.02),
                RateEntry::new("SOLUSDT", -0.05),
                RateEntry::new("DOGEUSDT", 0.10),
            ])
        }

        async fn fetch_all_24h_changes(&self) -> Result<Vec<RateEntry>, RestError> {
            let mut rows: Vec<RateEntry> = self
                .changes
                .iter()
                .map(|(s, v)| RateEntry::new(s.as_str(), *v))
                .collect();
            rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
            Ok(rows)
        }
    }

    fn options() -> EngineOptions {
        EngineOptions {
            pairs: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            top_n: 1,
            ..EngineOptions::default()
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn cadence_gates_refreshes() {
        let cadence = Cadence::new(500, 20);
        assert!(cadence.ranking_due(0) && cadence.pairs_due(0));
        assert!(!cadence.ranking_due(20) && cadence.pairs_due(20));
        assert!(!cadence.ranking_due(7) && !cadence.pairs_due(7));
        assert!(cadence.ranking_due(500) && cadence.pairs_due(500));
        assert!(Cadence::new(0, 0).pairs_due(3));
    }

    #[tokio::test]
    async fn first_tick_refreshes_everything_and_renders() {
        let mut monitor = Monitor::new(FakeSource::listed(), &options());
        let mut out = Vec::new();

        monitor.step(0, noon(), &mut out).await.unwrap();

        let state = monitor.state();
        assert_eq!(state.rankings.funding.head, vec!["SOLUSDT"]);
        assert_eq!(state.rankings.funding.tail, vec!["DOGEUSDT"]);
        assert_eq!(state.rankings.change.head, vec!["SOLUSDT"]);
        assert_eq!(state.rankings.change.tail, vec!["DOGEUSDT"]);

        let data = state.pair_data.as_ref().expect("pair data");
        assert_eq!(data.group(PairGroup::UserPairs).len(), 2);
        assert_eq!(data.distinct_pairs, 4);
        assert_eq!(data.duplicate_pairs, 2);
        assert_eq!(monitor.source.price_calls.load(Ordering::SeqCst), 4);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Funding countdown: 04:00:00"));
    }

    #[tokio::test]
    async fn off_cadence_ticks_only_render() {
        let mut monitor = Monitor::new(FakeSource::listed(), &options());
        let mut out = Vec::new();
        monitor.step(0, noon(), &mut out).await.unwrap();
        for tick in 1..20 {
            monitor.step(tick, noon(), &mut out).await.unwrap();
        }
        assert_eq!(monitor.source.universe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.source.price_calls.load(Ordering::SeqCst), 4);

        monitor.step(20, noon(), &mut out).await.unwrap();
        assert_eq!(monitor.source.universe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.source.price_calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn failed_ranking_refresh_keeps_last_known_rankings() {
        let mut monitor = Monitor::new(FakeSource::listed(), &options());
        let mut out = Vec::new();
        monitor.step(0, noon(), &mut out).await.unwrap();
        let before = monitor.state().rankings.clone();

        monitor.source.universe_down.store(true, Ordering::SeqCst);
        monitor.step(500, noon(), &mut out).await.unwrap();

        assert_eq!(monitor.state().rankings, before);
        assert!(monitor.state().pair_data.is_some());
    }

    #[tokio::test]
    async fn ranking_outage_from_start_still_shows_user_pairs() {
        let source = FakeSource::listed();
        source.universe_down.store(true, Ordering::SeqCst);
        let mut monitor = Monitor::new(source, &options());
        let mut out = Vec::new();

        monitor.step(0, noon(), &mut out).await.unwrap();

        let data = monitor.state().pair_data.as_ref().expect("pair data");
        assert_eq!(data.total_pairs(), 2);
        assert!(data.group(PairGroup::TopGainers).is_empty());
    }
}
