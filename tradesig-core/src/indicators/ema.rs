//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[period-1] = mean of the observed values among the first `period`.
//! Lookback: period - 1.

use super::ewm::ewm_mean;
use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        ema_of_series(closes, self.period)
    }
}

/// EMA of an arbitrary series. Shorter than `period` → all NaN.
///
/// Used directly by MACD for both the price EMAs and the signal line.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period {
        return vec![f64::NAN; n];
    }

    let (sum, count) = values[..period]
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    let seed = if count == 0 { f64::NAN } else { sum / count as f64 };

    let mut seeded = vec![f64::NAN; n];
    seeded[period - 1] = seed;
    seeded[period..].copy_from_slice(&values[period..]);

    let alpha = 2.0 / (period as f64 + 1.0);
    ewm_mean(&seeded, alpha, false, 0)
}
