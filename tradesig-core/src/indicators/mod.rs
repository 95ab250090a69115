//! Technical indicators as pure functions over ordered close prices.
//!
//! Every indicator maps a close series to an output series of the same
//! length. Warm-up positions are `f64::NAN`; the feature builder drops any
//! row where an indicator is still NaN.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per line/band, keeping the single-series `Indicator` trait.

pub mod bollinger;
pub mod ema;
pub mod ewm;
pub mod macd;
pub mod returns;
pub mod rsi;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use ewm::ewm_mean;
pub use macd::{Macd, MacdLine};
pub use returns::{annualized_volatility, pct_change, rolling_std};
pub use rsi::{rsi_of_series, Rsi};

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No output at index t may depend on a close at t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "bb_upper_20_2").
    fn name(&self) -> &str;

    /// Number of leading positions that are always NaN.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole close series.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Oscillating closes with drift, long enough for every default lookback.
#[cfg(test)]
pub fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Truncating the input never changes earlier outputs.
    #[test]
    fn no_lookahead_across_indicators() {
        let closes = wavy_closes(120);
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Rsi::new(14)),
            Box::new(Ema::new(12)),
            Box::new(Macd::macd(12, 26, 9)),
            Box::new(Macd::signal(12, 26, 9)),
            Box::new(Bollinger::upper(20, 2.0)),
            Box::new(Bollinger::middle(20, 2.0)),
            Box::new(Bollinger::lower(20, 2.0)),
        ];

        for ind in &indicators {
            let full = ind.compute(&closes);
            let truncated = ind.compute(&closes[..80]);
            for i in 0..80 {
                if full[i].is_nan() {
                    assert!(truncated[i].is_nan(), "{} at {i}", ind.name());
                } else {
                    assert_approx(truncated[i], full[i], 1e-9);
                }
            }
        }
    }

    #[test]
    fn warmup_matches_lookback() {
        let closes = wavy_closes(120);
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Rsi::new(14)),
            Box::new(Ema::new(12)),
            Box::new(Macd::macd(12, 26, 9)),
            Box::new(Macd::signal(12, 26, 9)),
            Box::new(Bollinger::middle(20, 2.0)),
        ];
        for ind in &indicators {
            let out = ind.compute(&closes);
            let lb = ind.lookback();
            assert!(out[..lb].iter().all(|v| v.is_nan()), "{}", ind.name());
            assert!(!out[lb].is_nan(), "{} first value at {lb}", ind.name());
        }
    }
}
