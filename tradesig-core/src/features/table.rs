//! Feature table: the builder's output.
//!
//! One row per candle that survived the indicator warm-up, ascending by
//! timestamp. Trade columns are present on every row after a merge and on
//! none when the symbol has no trade history.

use crate::domain::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;

/// Aggregated trade-log columns for one merge bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeFeatures {
    /// Mean realised PnL of the bucket's trades.
    pub pnl: f64,
    /// Fraction of the bucket's trades with pnl > 0, in [0, 1].
    pub pnl_positive: f64,
    /// Summed traded amount.
    pub amount: f64,
}

impl TradeFeatures {
    /// Fill value for candles with no matching bucket.
    pub const ZERO: TradeFeatures = TradeFeatures {
        pnl: 0.0,
        pnl_positive: 0.0,
        amount: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub returns: f64,
    pub volatility: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<TradeFeatures>,
}

impl FeatureRow {
    pub fn pnl(&self) -> f64 {
        self.trade.map_or(0.0, |t| t.pnl)
    }

    pub fn pnl_positive(&self) -> f64 {
        self.trade.map_or(0.0, |t| t.pnl_positive)
    }

    pub fn amount(&self) -> f64 {
        self.trade.map_or(0.0, |t| t.amount)
    }

    /// Indicator and price columns, in `INDICATOR_COLUMNS` order.
    fn numeric_fields(&self) -> [f64; 13] {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.rsi,
            self.macd,
            self.macd_signal,
            self.bb_upper,
            self.bb_middle,
            self.bb_lower,
            self.returns,
            self.volatility,
        ]
    }
}

const INDICATOR_COLUMNS: [&str; 13] = [
    "open",
    "high",
    "low",
    "close",
    "volume",
    "rsi",
    "macd",
    "macd_signal",
    "bb_upper",
    "bb_middle",
    "bb_lower",
    "returns",
    "volatility",
];

const TRADE_COLUMNS: [&str; 3] = ["pnl", "pnl_positive", "amount"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, rows: Vec<FeatureRow>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    /// True when the trade columns were merged in.
    pub fn has_trade_features(&self) -> bool {
        self.rows.iter().any(|r| r.trade.is_some())
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    /// Column names in CSV order. Trade columns only when merged.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec!["timestamp"];
        names.extend(INDICATOR_COLUMNS);
        if self.has_trade_features() {
            names.extend(TRADE_COLUMNS);
        }
        names
    }

    /// BLAKE3 hex digest over every row field.
    ///
    /// Identical candles and trades always hash identically; any change to a
    /// single value changes the digest.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        hasher.update(&self.timeframe.seconds().to_le_bytes());
        hasher.update(&(self.rows.len() as u64).to_le_bytes());

        for row in &self.rows {
            hasher.update(&row.timestamp.timestamp_millis().to_le_bytes());
            for value in row.numeric_fields() {
                hasher.update(&value.to_le_bytes());
            }
            match row.trade {
                Some(t) => {
                    hasher.update(&[1]);
                    hasher.update(&t.pnl.to_le_bytes());
                    hasher.update(&t.pnl_positive.to_le_bytes());
                    hasher.update(&t.amount.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }

        hasher.finalize().to_hex().to_string()
    }

    /// Write the table as CSV with a header row. Timestamps are RFC 3339.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        let with_trades = self.has_trade_features();
        wtr.write_record(self.column_names())?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(17);
            record.push(row.timestamp.to_rfc3339());
            record.extend(row.numeric_fields().iter().map(f64::to_string));
            if with_trades {
                record.push(row.pnl().to_string());
                record.push(row.pnl_positive().to_string());
                record.push(row.amount().to_string());
            }
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn row(i: i64, trade: Option<TradeFeatures>) -> FeatureRow {
        FeatureRow {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(4 * i),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5 + i as f64,
            volume: 10.0,
            rsi: 50.0,
            macd: 0.1,
            macd_signal: 0.05,
            bb_upper: 102.0,
            bb_middle: 100.0,
            bb_lower: 98.0,
            returns: 0.01,
            volatility: 0.2,
            trade,
        }
    }

    #[test]
    fn accessors_read_zero_without_trades() {
        let r = row(0, None);
        assert_eq!(r.pnl(), 0.0);
        assert_eq!(r.pnl_positive(), 0.0);
        assert_eq!(r.amount(), 0.0);
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = FeatureTable::new("BTC/USDT", Timeframe::FOUR_HOURS, vec![row(0, None), row(1, None)]);
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = a.clone();
        c.rows[1].rsi = 50.000001;
        assert_ne!(a.fingerprint(), c.fingerprint());

        let mut d = a.clone();
        d.rows[0].trade = Some(TradeFeatures::ZERO);
        assert_ne!(a.fingerprint(), d.fingerprint());
    }

    #[test]
    fn csv_omits_trade_columns_when_absent() {
        let table = FeatureTable::new("BTC/USDT", Timeframe::FOUR_HOURS, vec![row(0, None)]);
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("timestamp,open,high,low,close,volume,rsi"));
        assert!(!header.contains("pnl"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn csv_includes_trade_columns_after_merge() {
        let trade = TradeFeatures {
            pnl: 2.5,
            pnl_positive: 1.0,
            amount: 3.0,
        };
        let table = FeatureTable::new(
            "BTC/USDT",
            Timeframe::FOUR_HOURS,
            vec![row(0, Some(trade)), row(1, Some(TradeFeatures::ZERO))],
        );
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("volatility,pnl,pnl_positive,amount"));
        assert!(lines[1].ends_with(",2.5,1,3"));
        assert!(lines[2].ends_with(",0,0,0"));
    }

    #[test]
    fn json_skips_absent_trade_part() {
        let json = serde_json::to_string(&row(0, None)).unwrap();
        assert!(!json.contains("trade"));
        let back: FeatureRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trade, None);
    }
}
