//! Moving Average Convergence-Divergence (MACD).
//!
//! Two lines (separate Indicator instances):
//! - MACD: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(MACD, signal), seeded from the first defined MACD value
//!
//! If `fast > slow` the periods are swapped. A series shorter than
//! max(fast, slow, signal) yields no values at all.
//! Lookback: slow - 1 (MACD), slow + signal - 2 (signal).

use super::ema::ema_of_series;
use super::Indicator;

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    fn with_line(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        let (fast, slow) = if fast > slow { (slow, fast) } else { (fast, slow) };
        let prefix = match line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }

    pub fn macd(fast: usize, slow: usize, signal: usize) -> Self {
        Self::with_line(fast, slow, signal, MacdLine::Macd)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::with_line(fast, slow, signal, MacdLine::Signal)
    }

    /// Both lines at once, sharing the EMA work.
    pub fn compute_lines(&self, closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = closes.len();
        if n < self.fast.max(self.slow).max(self.signal) {
            return (vec![f64::NAN; n], vec![f64::NAN; n]);
        }

        let fast = ema_of_series(closes, self.fast);
        let slow = ema_of_series(closes, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

        let mut signal = vec![f64::NAN; n];
        if let Some(first) = macd.iter().position(|v| !v.is_nan()) {
            let smoothed = ema_of_series(&macd[first..], self.signal);
            signal[first..].copy_from_slice(&smoothed);
        }

        (macd, signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let (macd, signal) = self.compute_lines(closes);
        match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, wavy_closes, DEFAULT_EPSILON};

    #[test]
    fn macd_is_fast_minus_slow() {
        let closes = wavy_closes(60);
        let macd = Macd::macd(3, 6, 2).compute(&closes);
        let fast = ema_of_series(&closes, 3);
        let slow = ema_of_series(&closes, 6);
        for i in 5..60 {
            assert_approx(macd[i], fast[i] - slow[i], DEFAULT_EPSILON);
        }
        assert!(macd[4].is_nan());
    }

    #[test]
    fn signal_seeds_from_first_macd_value() {
        let closes = wavy_closes(60);
        let m = Macd::macd(3, 6, 4).compute(&closes);
        let s = Macd::signal(3, 6, 4).compute(&closes);
        // MACD first defined at 5, signal seed = mean(macd[5..9]) at index 8.
        assert!(s[7].is_nan());
        let seed = m[5..9].iter().sum::<f64>() / 4.0;
        assert_approx(s[8], seed, DEFAULT_EPSILON);
        let alpha = 2.0 / 5.0;
        assert_approx(s[9], alpha * m[9] + (1.0 - alpha) * seed, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_price_macd_is_zero() {
        let (macd, signal) = Macd::macd(12, 26, 9).compute_lines(&[50.0; 60]);
        assert_approx(macd[30], 0.0, DEFAULT_EPSILON);
        assert_approx(signal[40], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn swapped_periods_are_normalised() {
        let closes = wavy_closes(60);
        let a = Macd::macd(26, 12, 9).compute(&closes);
        let b = Macd::macd(12, 26, 9).compute(&closes);
        assert_eq!(Macd::macd(26, 12, 9).name(), "macd_12_26_9");
        assert_approx(a[40], b[40], DEFAULT_EPSILON);
    }

    #[test]
    fn short_series_all_nan() {
        let (macd, signal) = Macd::macd(12, 26, 9).compute_lines(&wavy_closes(25));
        assert!(macd.iter().all(|v| v.is_nan()));
        assert!(signal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn macd_lookback() {
        assert_eq!(Macd::macd(12, 26, 9).lookback(), 25);
        assert_eq!(Macd::signal(12, 26, 9).lookback(), 33);
    }
}
