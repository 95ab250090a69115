//! Source traits and structured error types.
//!
//! `CandleSource` and `TradeLogSource` abstract over where candles and
//! trade records come from (exchange adapter, CSV file, JSON trade log,
//! synthetic walk) so the feature builder can be driven and mocked without
//! knowing any of them. Timeouts and retries belong to implementations.

use crate::domain::{Candle, Timeframe, TradeRecord};
use thiserror::Error;

/// Structured error types for source operations.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supplies ordered OHLCV candles.
pub trait CandleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent candles for `symbol`, ascending
    /// by timestamp. An empty vector means "nothing available", not an error.
    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError>;
}

/// Supplies historical executed-trade records for every symbol.
pub trait TradeLogSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent trades. Not filtered by symbol.
    fn fetch_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, SourceError>;
}

impl<T: CandleSource + ?Sized> CandleSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        (**self).fetch_candles(symbol, timeframe, limit)
    }
}

impl<T: TradeLogSource + ?Sized> TradeLogSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, SourceError> {
        (**self).fetch_trades(limit)
    }
}

impl<T: CandleSource + ?Sized> CandleSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        (**self).fetch_candles(symbol, timeframe, limit)
    }
}

impl<T: TradeLogSource + ?Sized> TradeLogSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, SourceError> {
        (**self).fetch_trades(limit)
    }
}

/// Keep only the last `limit` items, preserving order.
pub(crate) fn take_most_recent<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    if items.len() > limit {
        items.drain(..items.len() - limit);
    }
    items
}
