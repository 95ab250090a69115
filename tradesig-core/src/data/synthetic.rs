//! Synthetic random-walk candles for development runs.
//!
//! The walk is seeded from BLAKE3(seed, symbol), so a given symbol always
//! produces the same candles. Timestamps end on the most recent period
//! boundary at or before `end` and step back one timeframe per candle.

use super::source::{CandleSource, SourceError};
use crate::domain::{Candle, Timeframe};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticCandleSource {
    seed: u64,
    start_price: f64,
    end: DateTime<Utc>,
}

impl SyntheticCandleSource {
    pub fn new(seed: u64, end: DateTime<Utc>) -> Self {
        Self {
            seed,
            start_price: 100.0,
            end,
        }
    }

    pub fn with_start_price(mut self, price: f64) -> Self {
        self.start_price = price;
        self
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }
}

impl CandleSource for SyntheticCandleSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let out_of_range = || {
            SourceError::Unavailable(format!(
                "{limit} {timeframe} candles reach outside the supported date range"
            ))
        };
        let step = timeframe.duration();
        let span = i32::try_from(limit - 1)
            .ok()
            .and_then(|steps| step.checked_mul(steps))
            .ok_or_else(out_of_range)?;
        let last = timeframe.floor(self.end);
        let first = last.checked_sub_signed(span).ok_or_else(out_of_range)?;

        let mut rng = self.rng_for(symbol);
        let mut candles = Vec::with_capacity(limit);
        let mut price = self.start_price;
        let mut timestamp = first;
        for i in 0..limit {
            if i > 0 {
                timestamp += step;
            }
            let step_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + step_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500.0..5_000.0);

            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
            price = close;
        }

        Ok(candles)
    }
}
