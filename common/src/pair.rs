use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Logical section a symbol is shown under. A symbol may belong to several.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum PairGroup {
    UserPairs,
    TopShorted,
    TopLonged,
    TopGainers,
    TopLosers,
}

impl PairGroup {
    /// Display order of the sections.
    pub const ALL: [PairGroup; 5] = [
        PairGroup::UserPairs,
        PairGroup::TopShorted,
        PairGroup::TopLonged,
        PairGroup::TopGainers,
        PairGroup::TopLosers,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PairGroup::UserPairs => "My Pairs Information",
            PairGroup::TopShorted => "Top shorted pairs",
            PairGroup::TopLonged => "Top longed pairs",
            PairGroup::TopGainers => "Top Gainers",
            PairGroup::TopLosers => "Top Losers",
        }
    }
}

impl fmt::Display for PairGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairGroup::UserPairs => write!(f, "user_pairs"),
            PairGroup::TopShorted => write!(f, "top_shorted"),
            PairGroup::TopLonged => write!(f, "top_longed"),
            PairGroup::TopGainers => write!(f, "top_gainers"),
            PairGroup::TopLosers => write!(f, "top_losers"),
        }
    }
}

/// Price, funding and 24h change of one symbol within one fetch cycle.
///
/// `None` means the upstream omitted or mangled the field; it is never
/// collapsed into zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PairSnapshot {
    pub symbol: Symbol,
    /// Last price exactly as the venue reported it.
    pub price: Option<String>,
    /// Last funding rate scaled to percent (`0.0001` -> `0.01`).
    pub funding_rate_pct: Option<f64>,
    pub change_24h_pct: Option<f64>,
}

impl PairSnapshot {
    pub fn unavailable(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            funding_rate_pct: None,
            change_24h_pct: None,
        }
    }
}

/// Result of one pair-data refresh, keyed by group in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PairData {
    pub groups: Vec<(PairGroup, Vec<PairSnapshot>)>,
    /// Distinct symbols fetched in this cycle.
    pub distinct_pairs: usize,
    /// Symbol references that reused an already-scheduled fetch.
    pub duplicate_pairs: usize,
}

impl PairData {
    /// Rows across all groups, duplicates included. Drives the redraw height.
    pub fn total_pairs(&self) -> usize {
        self.distinct_pairs + self.duplicate_pairs
    }

    pub fn group(&self, group: PairGroup) -> &[PairSnapshot] {
        self.groups
            .iter()
            .find(|(name, _)| *name == group)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or(&[])
    }
}

/// The `n` lowest and `n` highest entries of one sorted ranking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extremes {
    pub head: Vec<Symbol>,
    pub tail: Vec<Symbol>,
}

/// Last-known-good ranking results, read by every pair-data refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rankings {
    /// Funding ascending: head = most negative (shorted), tail = most positive (longed).
    pub funding: Extremes,
    /// 24h change descending: head = gainers, tail = losers.
    pub change: Extremes,
}

impl Rankings {
    /// Builds the ordered group list handed to the fan-out fetch.
    pub fn groups_with(&self, user_pairs: &[Symbol]) -> Vec<(PairGroup, Vec<Symbol>)> {
        vec![
            (PairGroup::UserPairs, user_pairs.to_vec()),
            (PairGroup::TopShorted, self.funding.head.clone()),
            (PairGroup::TopLonged, self.funding.tail.clone()),
            (PairGroup::TopGainers, self.change.head.clone()),
            (PairGroup::TopLosers, self.change.tail.clone()),
        ]
    }
}
