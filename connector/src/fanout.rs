use std::collections::{HashMap, HashSet};

use common::{PairData, PairGroup, PairSnapshot, Symbol};
use futures_util::future::join_all;
use tracing::debug;

use crate::MarketDataSource;

/// Fetches price, funding and 24h change for every symbol named by `groups`.
///
/// Each distinct symbol is fetched once per call, its three reads running
/// concurrently with those of every other symbol. The snapshot is then copied
/// into each group that lists the symbol, so every output group has the same
/// length and order as its input. Individual read failures surface as `None`
/// fields and never abort the batch.
pub async fn fetch_pair_data<S: MarketDataSource + ?Sized>(
    source: &S,
    groups: &[(PairGroup, Vec<Symbol>)],
) -> PairData {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut distinct: Vec<&str> = Vec::new();
    let mut duplicate_pairs = 0usize;
    for (_, symbols) in groups {
        for symbol in symbols {
            if seen.insert(symbol.as_str()) {
                distinct.push(symbol.as_str());
            } else {
                duplicate_pairs += 1;
            }
        }
    }

    let tasks = distinct.iter().map(|symbol| fetch_snapshot(source, symbol));
    let snapshots: HashMap<&str, PairSnapshot> = distinct
        .iter()
        .copied()
        .zip(join_all(tasks).await)
        .collect();

    let groups = groups
        .iter()
        .map(|(group, symbols)| {
            let rows = symbols
                .iter()
                .map(|symbol| {
                    snapshots
                        .get(symbol.as_str())
                        .cloned()
                        .unwrap_or_else(|| PairSnapshot::unavailable(symbol.clone()))
                })
                .collect();
            (*group, rows)
        })
        .collect();

    debug!(
        distinct = distinct.len(),
        duplicates = duplicate_pairs,
        "pair data fetched"
    );
    PairData {
        groups,
        distinct_pairs: distinct.len(),
        duplicate_pairs,
    }
}

async fn fetch_snapshot<S: MarketDataSource + ?Sized>(source: &S, symbol: &str) -> PairSnapshot {
    let (price, funding_rate_pct, change_24h_pct) = tokio::join!(
        source.fetch_price(symbol),
        source.fetch_funding_rate(symbol),
        source.fetch_24h_change(symbol),
    );
    PairSnapshot {
        symbol: symbol.to_string(),
        price,
        funding_rate_pct,
        change_24h_pct,
    }
}
