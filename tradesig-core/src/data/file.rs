//! File-backed sources: CSV candles and a JSON trade log.
//!
//! Both re-read their file on every fetch; nothing is cached.

use super::source::{take_most_recent, CandleSource, SourceError, TradeLogSource};
use crate::domain::trade::parse_timestamp_str;
use crate::domain::{Candle, Timeframe, TradeRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CsvCandleRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    symbol: Option<String>,
}

/// Candles from a CSV file with header
/// `timestamp,open,high,low,close,volume[,symbol]`.
///
/// Timestamps may be epoch milliseconds or RFC 3339 / naive UTC text. When a
/// `symbol` column is present, only matching rows are served; otherwise the
/// whole file is served for any symbol. Rows failing [`Candle::is_sane`] are
/// skipped and counted in a warning.
#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    path: PathBuf,
}

impl CsvCandleSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<Candle>, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;
        let headers = rdr.headers()?.clone();

        let mut candles = Vec::new();
        let mut skipped = 0usize;
        let mut first_skipped = None;
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let row: CsvCandleRow = record.deserialize(Some(&headers))?;

            if let Some(row_symbol) = row.symbol.as_deref() {
                if !row_symbol.is_empty() && row_symbol != symbol {
                    continue;
                }
            }

            let timestamp =
                parse_timestamp_str(&row.timestamp).ok_or_else(|| SourceError::Malformed {
                    line,
                    reason: format!("unparseable timestamp '{}'", row.timestamp),
                })?;

            let candle = Candle {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            };
            if !candle.is_sane() {
                skipped += 1;
                first_skipped.get_or_insert(line);
                continue;
            }
            candles.push(candle);
        }

        if let Some(first_line) = first_skipped {
            warn!(
                source = "csv",
                path = %self.path.display(),
                symbol,
                skipped,
                first_line,
                "skipped candles failing OHLC sanity check"
            );
        }
        Ok(candles)
    }
}

impl CandleSource for CsvCandleSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        Ok(take_most_recent(self.read_all(symbol)?, limit))
    }
}

/// Trade records from a JSON file holding an array of trade objects.
///
/// A missing file is an empty log: a bot that has never traded has none.
#[derive(Debug, Clone)]
pub struct JsonTradeLog {
    path: PathBuf,
}

impl JsonTradeLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TradeLogSource for JsonTradeLog {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, SourceError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let trades: Vec<TradeRecord> = serde_json::from_str(&text)?;
        Ok(take_most_recent(trades, limit))
    }
}
