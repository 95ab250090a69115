//! Timeframe: candle period and trade bucket size.
//!
//! Parsed from exchange-style strings (`1m`, `15m`, `1h`, `4h`, `1d`, `1w`).
//! Flooring is epoch-aligned: a timestamp floors to the largest multiple of
//! the period (in seconds since 1970-01-01T00:00Z) not after it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeframeError {
    #[error("empty timeframe")]
    Empty,

    #[error("invalid timeframe '{0}': expected <count><unit> with unit one of m, h, d, w")]
    Invalid(String),

    #[error("timeframe '{0}' must be positive")]
    NonPositive(String),

    #[error("timeframe '{0}' is too long")]
    TooLong(String),
}

/// Largest period whose `chrono::Duration` is representable.
const MAX_SECONDS: i64 = i64::MAX / 1_000;

/// A fixed, positive candle period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    seconds: i64,
}

impl Timeframe {
    pub const ONE_HOUR: Timeframe = Timeframe { seconds: 3_600 };
    pub const FOUR_HOURS: Timeframe = Timeframe { seconds: 14_400 };
    pub const ONE_DAY: Timeframe = Timeframe { seconds: 86_400 };

    pub fn from_seconds(seconds: i64) -> Result<Self, TimeframeError> {
        if seconds <= 0 {
            return Err(TimeframeError::NonPositive(format!("{seconds}s")));
        }
        if seconds > MAX_SECONDS {
            return Err(TimeframeError::TooLong(format!("{seconds}s")));
        }
        Ok(Self { seconds })
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn duration(&self) -> Duration {
        Duration::seconds(self.seconds)
    }

    /// Floor `ts` to this period's boundary. Sub-second precision is dropped.
    pub fn floor(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let secs = ts.timestamp();
        let floored = secs - secs.rem_euclid(self.seconds);
        DateTime::<Utc>::from_timestamp(floored, 0).unwrap_or(ts)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::FOUR_HOURS
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeframeError::Empty);
        }
        let unit_len = s.chars().last().map_or(0, char::len_utf8);
        let (count, unit) = s.split_at(s.len() - unit_len);
        let count: i64 = count
            .parse()
            .map_err(|_| TimeframeError::Invalid(s.to_string()))?;
        let unit_secs = match unit {
            "s" => 1,
            "m" => 60,
            "h" => 3_600,
            "d" => 86_400,
            "w" => 604_800,
            _ => return Err(TimeframeError::Invalid(s.to_string())),
        };
        if count <= 0 {
            return Err(TimeframeError::NonPositive(s.to_string()));
        }
        match count.checked_mul(unit_secs) {
            Some(seconds) if seconds <= MAX_SECONDS => Ok(Self { seconds }),
            _ => Err(TimeframeError::TooLong(s.to_string())),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s % 604_800 == 0 {
            write!(f, "{}w", s / 604_800)
        } else if s % 86_400 == 0 {
            write!(f, "{}d", s / 86_400)
        } else if s % 3_600 == 0 {
            write!(f, "{}h", s / 3_600)
        } else if s % 60 == 0 {
            write!(f, "{}m", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}
