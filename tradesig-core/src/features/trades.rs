//! Trade-log aggregation into fixed-size time buckets.

use super::table::TradeFeatures;
use crate::domain::{Timeframe, TradeRecord};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Per-bucket trade columns keyed by bucket start.
pub type TradeBuckets = BTreeMap<DateTime<Utc>, TradeFeatures>;

/// Result of aggregating one symbol's trades, with counts for logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeAggregation {
    pub buckets: TradeBuckets,
    /// Records whose symbol matched.
    pub matched: usize,
    /// Matched records dropped for an unparseable or missing timestamp.
    pub unparseable: usize,
}

impl TradeAggregation {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every matched record was dropped at the timestamp step.
    pub fn all_timestamps_invalid(&self) -> bool {
        self.matched > 0 && self.unparseable == self.matched
    }
}

#[derive(Default)]
struct Accumulator {
    trades: usize,
    winners: usize,
    pnl_sum: f64,
    pnl_count: usize,
    amount: f64,
}

impl Accumulator {
    fn push(&mut self, trade: &TradeRecord) {
        self.trades += 1;
        if trade.is_winner() {
            self.winners += 1;
        }
        if let Some(pnl) = trade.pnl.filter(|p| !p.is_nan()) {
            self.pnl_sum += pnl;
            self.pnl_count += 1;
        }
        if !trade.amount.is_nan() {
            self.amount += trade.amount;
        }
    }

    fn finish(&self) -> TradeFeatures {
        // A bucket with no recorded pnl reads 0, same as an unmatched candle.
        let pnl = if self.pnl_count == 0 {
            0.0
        } else {
            self.pnl_sum / self.pnl_count as f64
        };
        TradeFeatures {
            pnl,
            pnl_positive: self.winners as f64 / self.trades as f64,
            amount: self.amount,
        }
    }
}

/// Filter `trades` to `symbol`, drop unparseable timestamps and aggregate
/// into buckets of `bucket` width.
///
/// Per bucket: mean of the present pnl values, fraction of all trades with
/// pnl > 0, and summed amount.
pub fn aggregate_trades(trades: &[TradeRecord], symbol: &str, bucket: Timeframe) -> TradeAggregation {
    let mut accumulators: BTreeMap<DateTime<Utc>, Accumulator> = BTreeMap::new();
    let mut matched = 0;
    let mut unparseable = 0;

    for trade in trades.iter().filter(|t| t.symbol == symbol) {
        matched += 1;
        let Some(ts) = trade.parsed_timestamp() else {
            unparseable += 1;
            continue;
        };
        accumulators.entry(bucket.floor(ts)).or_default().push(trade);
    }

    TradeAggregation {
        buckets: accumulators
            .into_iter()
            .map(|(key, acc)| (key, acc.finish()))
            .collect(),
        matched,
        unparseable,
    }
}
