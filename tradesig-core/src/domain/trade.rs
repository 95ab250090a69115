//! TradeRecord: one executed trade as reported by the trade log.
//!
//! Timestamps arrive in whatever shape the log stored them (epoch
//! milliseconds, RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` string) and are
//! parsed lazily by the feature builder. Records whose timestamp cannot be
//! parsed are dropped there, not here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction. Matched case-insensitively; anything else, including a
/// missing or null side, reads as `Unknown`. The pipeline never looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum TradeSide {
    Buy,
    Sell,
    #[default]
    Unknown,
}

impl From<Option<String>> for TradeSide {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("buy") => TradeSide::Buy,
            Some(s) if s.eq_ignore_ascii_case("sell") => TradeSide::Sell,
            _ => TradeSide::Unknown,
        }
    }
}

/// Raw trade timestamp exactly as stored by the trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    Text(String),
}

impl RawTimestamp {
    /// Parse into a UTC instant. Returns `None` for anything unrecognisable.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms),
            RawTimestamp::Text(s) => parse_timestamp_str(s),
        }
    }
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        RawTimestamp::Text(ts.to_rfc3339())
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a textual timestamp. Naive forms are read as UTC; a bare integer
/// is read as epoch milliseconds.
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ms) = s.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A single executed trade from the bot's trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: Option<RawTimestamp>,
    pub symbol: String,
    #[serde(default)]
    pub side: TradeSide,
    #[serde(default)]
    pub amount: f64,
    /// Realised PnL. Open or unsettled trades carry none.
    #[serde(default)]
    pub pnl: Option<f64>,
}

impl TradeRecord {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_ref().and_then(RawTimestamp::parse)
    }

    pub fn is_winner(&self) -> bool {
        self.pnl.is_some_and(|p| p > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_trade() -> TradeRecord {
        TradeRecord {
            timestamp: Some(RawTimestamp::Text("2024-05-01 08:15:00".into())),
            symbol: "BTC/USDT".into(),
            side: TradeSide::Buy,
            amount: 0.5,
            pnl: Some(12.5),
        }
    }

    #[test]
    fn parses_naive_text_as_utc() {
        assert_eq!(
            sample_trade().parsed_timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp_str("2024-05-01T10:15:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap());
    }

    #[test]
    fn parses_epoch_millis() {
        let raw = RawTimestamp::EpochMillis(1_714_551_300_000);
        assert_eq!(
            raw.parse(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp_str("1714551300000"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn parses_date_only_as_midnight() {
        assert_eq!(
            parse_timestamp_str("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_timestamp_str("not a date"), None);
        assert_eq!(parse_timestamp_str(""), None);
        let mut trade = sample_trade();
        trade.timestamp = None;
        assert_eq!(trade.parsed_timestamp(), None);
    }

    #[test]
    fn is_winner() {
        assert!(sample_trade().is_winner());
        let mut loser = sample_trade();
        loser.pnl = Some(-1.0);
        assert!(!loser.is_winner());
        loser.pnl = None;
        assert!(!loser.is_winner());
    }

    #[test]
    fn deserializes_mixed_timestamp_shapes() {
        let json = r#"[
            {"timestamp": 1714551300000, "symbol": "BTC/USDT", "side": "buy", "amount": 1.0, "pnl": 3.0},
            {"timestamp": "2024-05-01 09:00:00", "symbol": "BTC/USDT", "side": "sell", "amount": 2.0},
            {"timestamp": null, "symbol": "ETH/USDT", "side": "sell"}
        ]"#;
        let trades: Vec<TradeRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].timestamp, Some(RawTimestamp::EpochMillis(1_714_551_300_000)));
        assert_eq!(trades[1].pnl, None);
        assert_eq!(trades[2].timestamp, None);
        assert_eq!(trades[2].amount, 0.0);
    }

    #[test]
    fn side_is_lenient() {
        let json = r#"[
            {"timestamp": 1714551300000, "symbol": "BTC/USDT", "side": "BUY", "amount": 1.0},
            {"timestamp": 1714551300000, "symbol": "BTC/USDT", "side": " Sell "},
            {"timestamp": 1714551300000, "symbol": "BTC/USDT", "side": "close"},
            {"timestamp": 1714551300000, "symbol": "BTC/USDT", "side": null},
            {"timestamp": 1714551300000, "symbol": "BTC/USDT"}
        ]"#;
        let trades: Vec<TradeRecord> = serde_json::from_str(json).unwrap();
        let sides: Vec<TradeSide> = trades.iter().map(|t| t.side).collect();
        assert_eq!(
            sides,
            [
                TradeSide::Buy,
                TradeSide::Sell,
                TradeSide::Unknown,
                TradeSide::Unknown,
                TradeSide::Unknown
            ]
        );
        assert_eq!(serde_json::to_string(&TradeSide::Sell).unwrap(), "\"sell\"");
    }
}
