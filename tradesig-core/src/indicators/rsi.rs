//! Relative Strength Index (RSI).
//!
//! Wilder smoothing as a bias-adjusted exponentially weighted mean with
//! alpha = 1/period over the positive and negative parts of consecutive
//! close differences, requiring `period` observed differences.
//!
//! RSI = 100 * avg_gain / (avg_gain + |avg_loss|), i.e. 100 - 100 / (1 + RS).
//! Lookback: period (first value at index `period`).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → NaN.

use super::ewm::ewm_mean;
use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        rsi_of_series(closes, self.period)
    }
}

/// RSI over a raw close slice.
pub fn rsi_of_series(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    if period == 0 || n <= period {
        return vec![f64::NAN; n];
    }

    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        if change.is_nan() {
            continue;
        }
        gains[i] = if change > 0.0 { change } else { 0.0 };
        losses[i] = if change < 0.0 { change } else { 0.0 };
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = ewm_mean(&gains, alpha, true, period);
    let avg_loss = ewm_mean(&losses, alpha, true, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| 100.0 * g / (g + l.abs()))
        .collect()
}
