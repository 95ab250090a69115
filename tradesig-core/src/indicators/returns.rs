//! Simple returns and rolling volatility.

/// Fractional close-to-close change. Index 0 is NaN.
pub fn pct_change(closes: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; closes.len()];
    for i in 1..closes.len() {
        result[i] = closes[i] / closes[i - 1] - 1.0;
    }
    result
}

/// Rolling sample standard deviation (divide by N-1) over `window` values.
///
/// NaN until a full window is available, and for every window containing NaN.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window < 2 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let ss = slice.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        result[i] = (ss / (window - 1) as f64).sqrt();
    }
    result
}

/// Rolling standard deviation of simple returns, scaled by sqrt(periods_per_year).
pub fn annualized_volatility(closes: &[f64], window: usize, periods_per_year: f64) -> Vec<f64> {
    let scale = periods_per_year.sqrt();
    rolling_std(&pct_change(closes), window)
        .into_iter()
        .map(|v| v * scale)
        .collect()
}
