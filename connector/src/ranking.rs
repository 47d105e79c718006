use std::cmp::Ordering;

use common::{constant::QUOTE_ASSET, Extremes, Rankings};
use tracing::{debug, warn};

use crate::{MarketDataSource, RateEntry, RestError, Universe};

/// Most negative / most positive funding among tradable USDT perpetuals.
pub async fn top_funding_extremes<S: MarketDataSource + ?Sized>(
    source: &S,
    universe: &Universe,
    n: usize,
) -> Result<Extremes, RestError> {
    let rates = source.fetch_all_funding_rates().await?;
    Ok(rank_funding_extremes(rates, universe, n))
}

/// Biggest 24h gainers / losers among tradable USDT perpetuals.
pub async fn top_change_extremes<S: MarketDataSource + ?Sized>(
    source: &S,
    universe: &Universe,
    n: usize,
) -> Result<Extremes, RestError> {
    let changes = source.fetch_all_24h_changes().await?;
    Ok(rank_change_extremes(changes, universe, n))
}

/// Refreshes both rankings against one universe snapshot.
///
/// A failed half keeps its entry from `previous`; only a failed universe fetch
/// is reported as an error.
pub async fn fetch_rankings<S: MarketDataSource + ?Sized>(
    source: &S,
    n: usize,
    previous: &Rankings,
) -> Result<Rankings, RestError> {
    let universe = source.fetch_universe().await?;
    let (funding, change) = tokio::join!(
        top_funding_extremes(source, &universe, n),
        top_change_extremes(source, &universe, n),
    );
    let funding = funding.unwrap_or_else(|err| {
        warn!(?err, "funding ranking failed, keeping previous result");
        previous.funding.clone()
    });
    let change = change.unwrap_or_else(|err| {
        warn!(?err, "24h change ranking failed, keeping previous result");
        previous.change.clone()
    });
    debug!(
        universe = universe.len(),
        shorted = ?funding.head,
        longed = ?funding.tail,
        gainers = ?change.head,
        losers = ?change.tail,
        "rankings refreshed"
    );
    Ok(Rankings { funding, change })
}

/// Sorted ascending: head = top shorted, tail = top longed.
pub fn rank_funding_extremes(rates: Vec<RateEntry>, universe: &Universe, n: usize) -> Extremes {
    let mut eligible = eligible_entries(rates, universe);
    eligible.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    split_extremes(eligible, n)
}

/// Sorted descending: head = top gainers, tail = top losers.
pub fn rank_change_extremes(changes: Vec<RateEntry>, universe: &Universe, n: usize) -> Extremes {
    let mut eligible = eligible_entries(changes, universe);
    eligible.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    split_extremes(eligible, n)
}

fn eligible_entries(entries: Vec<RateEntry>, universe: &Universe) -> Vec<RateEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.symbol.ends_with(QUOTE_ASSET) && universe.contains(&entry.symbol))
        .collect()
}

/// Head and tail come from the same list and overlap when it holds fewer
/// than `2 * n` entries.
fn split_extremes(sorted: Vec<RateEntry>, n: usize) -> Extremes {
    let head = sorted.iter().take(n).map(|e| e.symbol.clone()).collect();
    let tail = sorted[sorted.len().saturating_sub(n)..]
        .iter()
        .map(|e| e.symbol.clone())
        .collect();
    Extremes { head, tail }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(symbols: &[&str]) -> Universe {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn entries(rows: &[(&str, f64)]) -> Vec<RateEntry> {
        rows.iter().map(|(s, v)| RateEntry::new(*s, *v)).collect()
    }

    #[test]
    fn funding_extremes_take_both_ends_of_ascending_sort() {
        let rates = entries(&[
            ("AUSDT", 0.01),
            ("BUSDT", -0.30),
            ("CUSDT", 0.20),
            ("DUSDT", -0.05),
            ("EUSDT", 0.05),
        ]);
        let uni = universe(&["AUSDT", "BUSDT", "CUSDT", "DUSDT", "EUSDT"]);
        let ranked = rank_funding_extremes(rates, &uni, 2);
        assert_eq!(ranked.head, vec!["BUSDT", "DUSDT"]);
        assert_eq!(ranked.tail, vec!["EUSDT", "CUSDT"]);
    }

    #[test]
    fn change_extremes_take_both_ends_of_descending_sort() {
        let changes = entries(&[
            ("AUSDT", 1.0),
            ("BUSDT", 12.5),
            ("CUSDT", -8.0),
            ("DUSDT", 3.0),
            ("EUSDT", -2.0),
        ]);
        let uni = universe(&["AUSDT", "BUSDT", "CUSDT", "DUSDT", "EUSDT"]);
        let ranked = rank_change_extremes(changes, &uni, 2);
        assert_eq!(ranked.head, vec!["BUSDT", "DUSDT"]);
        assert_eq!(ranked.tail, vec!["EUSDT", "CUSDT"]);
    }

    #[test]
    fn non_usdt_and_unlisted_symbols_are_excluded() {
        let rates = entries(&[
            ("BTCBUSD", -1.0),
            ("ETHBTC", -0.9),
            ("DELISTEDUSDT", -0.8),
            ("SOLUSDT", 0.1),
        ]);
        let uni = universe(&["BTCBUSD", "ETHBTC", "SOLUSDT"]);
        let ranked = rank_funding_extremes(rates, &uni, 5);
        assert_eq!(ranked.head, vec!["SOLUSDT"]);
        assert_eq!(ranked.tail, vec!["SOLUSDT"]);
    }

    #[test]
    fn small_universe_caps_each_side_and_overlaps() {
        let changes = entries(&[("AUSDT", 1.0), ("BUSDT", 2.0), ("CUSDT", 3.0)]);
        let uni = universe(&["AUSDT", "BUSDT", "CUSDT"]);
        let ranked = rank_change_extremes(changes, &uni, 2);
        assert_eq!(ranked.head, vec!["CUSDT", "BUSDT"]);
        assert_eq!(ranked.tail, vec!["BUSDT", "AUSDT"]);

        let ranked = rank_change_extremes(Vec::new(), &uni, 2);
        assert!(ranked.head.is_empty());
        assert!(ranked.tail.is_empty());
    }

    #[test]
    fn ties_keep_venue_order() {
        let rates = entries(&[("XUSDT", 0.01), ("YUSDT", 0.01), ("ZUSDT", 0.01)]);
        let uni = universe(&["XUSDT", "YUSDT", "ZUSDT"]);
        let ranked = rank_funding_extremes(rates, &uni, 1);
        assert_eq!(ranked.head, vec!["XUSDT"]);
        assert_eq!(ranked.tail, vec!["ZUSDT"]);
    }

    #[test]
    fn zero_n_yields_empty_sides() {
        let rates = entries(&[("XUSDT", 0.01)]);
        let uni = universe(&["XUSDT"]);
        let ranked = rank_funding_extremes(rates, &uni, 0);
        assert!(ranked.head.is_empty());
        assert!(ranked.tail.is_empty());
    }
}
