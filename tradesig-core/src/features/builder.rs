//! Feature builder: fetch, compute, aggregate, merge.

use super::compute::indicator_rows;
use super::merge::merge_trade_features;
use super::table::FeatureTable;
use super::trades::aggregate_trades;
use crate::config::FeatureConfig;
use crate::data::{CandleSource, SourceError, TradeLogSource};
use crate::domain::{Candle, TradeRecord};
use crate::error::{PipelineError, Stage};
use tracing::{debug, error, warn};

type Fetched = (
    Result<Vec<Candle>, SourceError>,
    Result<Vec<TradeRecord>, SourceError>,
);

/// Builds one feature table per symbol from a candle source and a trade log.
///
/// Holds no state between builds; every call fetches fresh data.
pub struct FeatureBuilder<C, T> {
    candles: C,
    trades: T,
    config: FeatureConfig,
}

impl<C: CandleSource, T: TradeLogSource> FeatureBuilder<C, T> {
    pub fn new(candles: C, trades: T, config: FeatureConfig) -> Self {
        Self {
            candles,
            trades,
            config,
        }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Build the feature table for `symbol`, or `None` if any stage came up
    /// empty or failed. Never panics on bad data; the reason is logged.
    pub fn build(&self, symbol: &str) -> Option<FeatureTable> {
        match self.try_build(symbol) {
            Ok(table) => Some(table),
            Err(err) => {
                log_degradation(&err, symbol);
                None
            }
        }
    }

    /// Like [`build`](Self::build) but returns the degradation reason.
    pub fn try_build(&self, symbol: &str) -> Result<FeatureTable, PipelineError> {
        let (candles, trades) = self.fetch(symbol);

        let candles = match candles {
            Ok(candles) if !candles.is_empty() => candles,
            Ok(_) | Err(SourceError::SymbolNotFound { .. }) => {
                return Err(PipelineError::unavailable(Stage::Candles, symbol));
            }
            Err(e) => return Err(PipelineError::source(Stage::Candles, e)),
        };
        debug!(
            stage = %Stage::Candles,
            symbol,
            rows = candles.len(),
            source = self.candles.name(),
            "fetched candles"
        );

        let rows = indicator_rows(&candles, &self.config)?;
        if rows.is_empty() {
            return Err(PipelineError::unavailable(Stage::Indicators, symbol));
        }
        debug!(
            stage = %Stage::Indicators,
            symbol,
            rows = rows.len(),
            dropped = candles.len() - rows.len(),
            "computed indicators"
        );

        let trades = trades.map_err(|e| PipelineError::source(Stage::Trades, e))?;
        let aggregation = aggregate_trades(&trades, symbol, self.config.trade_bucket);
        if aggregation.matched == 0 {
            debug!(stage = %Stage::Trades, symbol, fetched = trades.len(), "no trades");
        } else if aggregation.all_timestamps_invalid() {
            warn!(
                stage = %Stage::Trades,
                symbol,
                matched = aggregation.matched,
                "every trade timestamp was unparseable"
            );
        } else if aggregation.unparseable > 0 {
            debug!(
                stage = %Stage::Trades,
                symbol,
                dropped = aggregation.unparseable,
                "dropped trades with unparseable timestamps"
            );
        }

        if aggregation.is_empty() {
            debug!(stage = %Stage::Merge, symbol, "no trade buckets; keeping indicator table as is");
        }
        let rows = merge_trade_features(rows, &aggregation.buckets, self.config.timeframe);
        debug!(
            stage = %Stage::Merge,
            symbol,
            rows = rows.len(),
            buckets = aggregation.buckets.len(),
            "built feature table"
        );

        Ok(FeatureTable::new(symbol, self.config.timeframe, rows))
    }

    fn fetch(&self, symbol: &str) -> Fetched {
        let timeframe = self.config.timeframe;
        let fetch_candles =
            || self.candles.fetch_candles(symbol, timeframe, self.config.candle_limit);
        let fetch_trades = || self.trades.fetch_trades(self.config.trade_limit);

        if self.config.concurrent_fetch {
            rayon::join(fetch_candles, fetch_trades)
        } else {
            (fetch_candles(), fetch_trades())
        }
    }
}

fn log_degradation(err: &PipelineError, symbol: &str) {
    let stage = err.stage().map_or("unknown", Stage::as_str);
    if err.is_data_unavailable() {
        warn!(stage, symbol, error = %err, "feature build returned no table");
    } else {
        error!(stage, symbol, error = %err, "feature build failed");
    }
}
