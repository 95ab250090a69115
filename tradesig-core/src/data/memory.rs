//! In-memory sources for embedding and tests.

use super::source::{take_most_recent, CandleSource, SourceError, TradeLogSource};
use crate::domain::{Candle, Timeframe, TradeRecord};
use std::collections::HashMap;

/// Serves pre-loaded candles per symbol. Unknown symbols are
/// [`SourceError::SymbolNotFound`]; a known symbol may hold no candles.
#[derive(Debug, Clone, Default)]
pub struct MemoryCandleSource {
    candles: HashMap<String, Vec<Candle>>,
}

impl MemoryCandleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candles(mut self, symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        self.insert(symbol, candles);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<String>, candles: Vec<Candle>) {
        self.candles.insert(symbol.into(), candles);
    }
}

impl CandleSource for MemoryCandleSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        let candles = self
            .candles
            .get(symbol)
            .cloned()
            .ok_or_else(|| SourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        Ok(take_most_recent(candles, limit))
    }
}

/// Serves a fixed list of trade records, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryTradeLog {
    trades: Vec<TradeRecord>,
}

impl MemoryTradeLog {
    pub fn new(trades: Vec<TradeRecord>) -> Self {
        Self { trades }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl TradeLogSource for MemoryTradeLog {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, SourceError> {
        Ok(take_most_recent(self.trades.clone(), limit))
    }
}

/// A source that always fails. Useful for exercising degradation paths.
#[derive(Debug, Clone)]
pub struct FailingSource {
    reason: String,
}

impl FailingSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl CandleSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch_candles(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        _limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        Err(SourceError::Unavailable(self.reason.clone()))
    }
}

impl TradeLogSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch_trades(&self, _limit: usize) -> Result<Vec<TradeRecord>, SourceError> {
        Err(SourceError::Unavailable(self.reason.clone()))
    }
}
