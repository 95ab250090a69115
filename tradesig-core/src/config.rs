//! Serializable pipeline configuration.
//!
//! Every field has a default, so an empty TOML file is a valid config and a
//! partial file overrides only what it names.

use crate::domain::Timeframe;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Feature builder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Candle period requested from the candle source; also the merge key's floor.
    pub timeframe: Timeframe,
    pub candle_limit: usize,
    pub trade_limit: usize,
    /// Trade aggregation bucket size.
    pub trade_bucket: Timeframe,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std: f64,
    pub volatility_window: usize,
    pub annualization_days: f64,
    /// Fetch candles and trades in parallel.
    pub concurrent_fetch: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::FOUR_HOURS,
            candle_limit: 500,
            trade_limit: 1000,
            trade_bucket: Timeframe::ONE_HOUR,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std: 2.0,
            volatility_window: 20,
            annualization_days: 252.0,
            concurrent_fetch: true,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bb_period", self.bb_period),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("features.{name} must be >= 1")));
            }
        }
        if self.volatility_window < 2 {
            return Err(ConfigError::Invalid(
                "features.volatility_window must be >= 2".into(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::Invalid(format!(
                "features.macd_fast ({}) must be < macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if !(self.bb_std.is_finite() && self.bb_std > 0.0) {
            return Err(ConfigError::Invalid("features.bb_std must be > 0".into()));
        }
        if !(self.annualization_days.is_finite() && self.annualization_days > 0.0) {
            return Err(ConfigError::Invalid(
                "features.annualization_days must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// RSI threshold-signal parameters shared by every generator variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// Tables shorter than this never produce a signal.
    pub min_rows: usize,
    pub rsi_period: usize,
    pub volatility_window: usize,
    pub annualization_days: f64,
    pub base_buy: f64,
    pub base_sell: f64,
    /// Threshold shift per unit of volatility: buy = base_buy + v*scale, sell = base_sell - v*scale.
    pub volatility_scale: f64,
    /// success_prob above this loosens entries.
    pub high_confidence: f64,
    /// success_prob below this tightens entries.
    pub low_confidence: f64,
    pub aggressive_buy_factor: f64,
    pub aggressive_sell_factor: f64,
    pub conservative_buy_factor: f64,
    pub conservative_sell_factor: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            min_rows: 50,
            rsi_period: 14,
            volatility_window: 20,
            annualization_days: 252.0,
            base_buy: 45.0,
            base_sell: 55.0,
            volatility_scale: 5.0,
            high_confidence: 0.7,
            low_confidence: 0.3,
            aggressive_buy_factor: 0.9,
            aggressive_sell_factor: 1.1,
            conservative_buy_factor: 1.1,
            conservative_sell_factor: 0.9,
        }
    }
}

impl SignalParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rsi_period == 0 {
            return Err(ConfigError::Invalid("signals.rsi_period must be >= 1".into()));
        }
        if self.volatility_window < 2 {
            return Err(ConfigError::Invalid(
                "signals.volatility_window must be >= 2".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.low_confidence)
            || !(0.0..=1.0).contains(&self.high_confidence)
            || self.low_confidence > self.high_confidence
        {
            return Err(ConfigError::Invalid(format!(
                "signals confidence bounds must satisfy 0 <= low ({}) <= high ({}) <= 1",
                self.low_confidence, self.high_confidence
            )));
        }
        if self.base_buy > self.base_sell {
            return Err(ConfigError::Invalid(format!(
                "signals.base_buy ({}) must not exceed base_sell ({})",
                self.base_buy, self.base_sell
            )));
        }
        Ok(())
    }
}

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub features: FeatureConfig,
    pub signals: SignalParams,
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.features.validate()?;
        self.signals.validate()
    }
}
