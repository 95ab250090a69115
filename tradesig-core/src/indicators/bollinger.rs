//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N). A window containing NaN yields NaN.
//! Lookback: period - 1.

use super::Indicator;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let prefix = match band {
            BollingerBand::Upper => "bb_upper",
            BollingerBand::Middle => "bb_middle",
            BollingerBand::Lower => "bb_lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("{prefix}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Lower)
    }

    /// All three bands in one pass: (upper, middle, lower).
    pub fn compute_bands(&self, closes: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = closes.len();
        let mut upper = vec![f64::NAN; n];
        let mut middle = vec![f64::NAN; n];
        let mut lower = vec![f64::NAN; n];

        if n < self.period {
            return (upper, middle, lower);
        }

        for i in (self.period - 1)..n {
            let window = &closes[i + 1 - self.period..=i];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }

            let mean = window.iter().sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let width = self.multiplier * variance.sqrt();

            middle[i] = mean;
            upper[i] = mean + width;
            lower[i] = mean - width;
        }

        (upper, middle, lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let (upper, middle, lower) = self.compute_bands(closes);
        match self.band {
            BollingerBand::Upper => upper,
            BollingerBand::Middle => middle,
            BollingerBand::Lower => lower,
        }
    }
}
