//! Indicator stage: candles in, complete indicator rows out.

use super::table::FeatureRow;
use crate::config::FeatureConfig;
use crate::domain::candle::first_unordered;
use crate::domain::Candle;
use crate::error::{PipelineError, Stage};
use crate::indicators::{annualized_volatility, pct_change, Bollinger, Indicator, Macd, Rsi};

/// Lookback of the slowest configured indicator, i.e. the number of leading
/// rows that are always dropped.
///
/// Panics on a zero period; call [`FeatureConfig::validate`] first.
pub fn warmup_rows(config: &FeatureConfig) -> usize {
    let indicators: [Box<dyn Indicator>; 3] = [
        Box::new(Rsi::new(config.rsi_period)),
        Box::new(Macd::signal(config.macd_fast, config.macd_slow, config.macd_signal)),
        Box::new(Bollinger::middle(config.bb_period, config.bb_std)),
    ];
    let indicator_lookback = indicators.iter().map(|i| i.lookback()).max().unwrap_or(0);
    // Volatility needs a full window of returns, which start at index 1.
    indicator_lookback.max(config.volatility_window)
}

/// Compute every indicator column and drop rows with any NaN field.
///
/// Candles must be strictly ascending by timestamp. An invalid config is a
/// computation error rather than a panic.
pub fn indicator_rows(
    candles: &[Candle],
    config: &FeatureConfig,
) -> Result<Vec<FeatureRow>, PipelineError> {
    config
        .validate()
        .map_err(|e| PipelineError::computation(Stage::Indicators, e.to_string()))?;
    if let Some(i) = first_unordered(candles) {
        return Err(PipelineError::computation(
            Stage::Indicators,
            format!(
                "candle {i} at {} is not after {}",
                candles[i].timestamp,
                candles[i - 1].timestamp
            ),
        ));
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let rsi = Rsi::new(config.rsi_period).compute(&closes);
    let (macd, macd_signal) =
        Macd::macd(config.macd_fast, config.macd_slow, config.macd_signal).compute_lines(&closes);
    let (bb_upper, bb_middle, bb_lower) =
        Bollinger::middle(config.bb_period, config.bb_std).compute_bands(&closes);
    let returns = pct_change(&closes);
    let volatility =
        annualized_volatility(&closes, config.volatility_window, config.annualization_days);

    let rows = candles
        .iter()
        .enumerate()
        .map(|(i, c)| FeatureRow {
            timestamp: c.timestamp,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
            rsi: rsi[i],
            macd: macd[i],
            macd_signal: macd_signal[i],
            bb_upper: bb_upper[i],
            bb_middle: bb_middle[i],
            bb_lower: bb_lower[i],
            returns: returns[i],
            volatility: volatility[i],
            trade: None,
        })
        .filter(is_complete)
        .collect();

    Ok(rows)
}

fn is_complete(row: &FeatureRow) -> bool {
    [
        row.open,
        row.high,
        row.low,
        row.close,
        row.volume,
        row.rsi,
        row.macd,
        row.macd_signal,
        row.bb_upper,
        row.bb_middle,
        row.bb_lower,
        row.returns,
        row.volatility,
    ]
    .iter()
    .all(|v| !v.is_nan())
}
