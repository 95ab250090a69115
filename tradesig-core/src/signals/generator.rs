//! RSI threshold signal generator.
//!
//! One parameterized implementation behind the momentum, trend and
//! volatility variants. They differ only in where volatility comes from and
//! whether the extra undefined-data guards run.

use super::series::CloseSeries;
use super::thresholds::RsiThresholds;
use crate::config::SignalParams;
use crate::domain::{MarketConditions, Signal};
use crate::error::{PipelineError, Stage};
use crate::indicators::{annualized_volatility, pct_change, rsi_of_series};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, warn};

/// Where the threshold-shifting volatility is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilitySource {
    /// Latest rolling annualized volatility of the table's own closes.
    Local,
    /// `avg_volatility` of the supplied market snapshot, 0 when missing.
    MarketConditions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Momentum,
    Trend,
    Volatility,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Momentum, Strategy::Trend, Strategy::Volatility];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Momentum => "momentum",
            Strategy::Trend => "trend",
            Strategy::Volatility => "volatility",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "momentum" => Ok(Strategy::Momentum),
            "trend" => Ok(Strategy::Trend),
            "volatility" => Ok(Strategy::Volatility),
            other => Err(format!(
                "unknown strategy '{other}' (expected momentum, trend or volatility)"
            )),
        }
    }
}

/// Everything that went into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalEvaluation {
    pub signal: Signal,
    pub rsi: f64,
    pub volatility: f64,
    pub thresholds: RsiThresholds,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RsiSignalGenerator {
    strategy: Strategy,
    volatility_source: VolatilitySource,
    strict_guards: bool,
    params: SignalParams,
}

impl RsiSignalGenerator {
    pub fn momentum() -> Self {
        Self::for_strategy(Strategy::Momentum)
    }

    pub fn trend() -> Self {
        Self::for_strategy(Strategy::Trend)
    }

    /// Reacts to the market-wide volatility regime and refuses windows with
    /// undefined closes, returns or RSI.
    pub fn volatility() -> Self {
        Self::for_strategy(Strategy::Volatility)
    }

    pub fn for_strategy(strategy: Strategy) -> Self {
        let (volatility_source, strict_guards) = match strategy {
            Strategy::Momentum | Strategy::Trend => (VolatilitySource::Local, false),
            Strategy::Volatility => (VolatilitySource::MarketConditions, true),
        };
        Self {
            strategy,
            volatility_source,
            strict_guards,
            params: SignalParams::default(),
        }
    }

    pub fn with_params(mut self, params: SignalParams) -> Self {
        self.params = params;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn volatility_source(&self) -> VolatilitySource {
        self.volatility_source
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Decide buy, sell or none. Any failure or unmet guard yields
    /// `Signal::None` and is logged.
    pub fn signal<S: CloseSeries + ?Sized>(
        &self,
        table: &S,
        market: Option<&MarketConditions>,
        success_prob: Option<f64>,
    ) -> Signal {
        match self.evaluate(table, market, success_prob) {
            Ok(evaluation) => evaluation.signal,
            Err(err) => {
                let strategy = self.strategy.as_str();
                if err.is_data_unavailable() {
                    warn!(stage = %Stage::Signal, strategy, error = %err, "no signal");
                } else {
                    error!(
                        stage = %Stage::Signal,
                        strategy,
                        error = %err,
                        "signal computation failed"
                    );
                }
                Signal::None
            }
        }
    }

    /// Like [`signal`](Self::signal) but returns the intermediate values, or
    /// the reason no decision could be made.
    pub fn evaluate<S: CloseSeries + ?Sized>(
        &self,
        table: &S,
        market: Option<&MarketConditions>,
        success_prob: Option<f64>,
    ) -> Result<SignalEvaluation, PipelineError> {
        let p = &self.params;
        let rows = table.row_count();
        if rows < p.min_rows {
            return Err(PipelineError::insufficient(
                Stage::Signal,
                format!("{rows} rows, need {}", p.min_rows),
            ));
        }

        let closes = table.closes()?;
        if closes.len() != rows {
            return Err(PipelineError::computation(
                Stage::Signal,
                format!("close column has {} values for {rows} rows", closes.len()),
            ));
        }

        if self.strict_guards {
            if closes.iter().any(|c| c.is_nan()) {
                return Err(PipelineError::insufficient(Stage::Signal, "undefined close"));
            }
            if pct_change(&closes).iter().all(|r| r.is_nan()) {
                return Err(PipelineError::insufficient(
                    Stage::Signal,
                    "every return is undefined",
                ));
            }
        }

        let rsi_series = rsi_of_series(&closes, p.rsi_period);
        if self.strict_guards && rsi_series.iter().all(|r| r.is_nan()) {
            return Err(PipelineError::insufficient(
                Stage::Signal,
                "every RSI value is undefined",
            ));
        }
        let rsi = rsi_series.last().copied().unwrap_or(f64::NAN);

        let volatility = match self.volatility_source {
            VolatilitySource::Local => {
                annualized_volatility(&closes, p.volatility_window, p.annualization_days)
                    .last()
                    .copied()
                    .unwrap_or(0.0)
            }
            VolatilitySource::MarketConditions => {
                market.map_or(0.0, MarketConditions::avg_volatility_or_zero)
            }
        };

        let success_prob = self.checked_success_prob(success_prob);
        let thresholds =
            RsiThresholds::from_volatility(volatility, p).adjust_for_success(success_prob, p);
        let signal = thresholds.decide(rsi);

        debug!(
            stage = %Stage::Signal,
            strategy = self.strategy.as_str(),
            rows,
            rsi,
            volatility,
            buy = thresholds.buy,
            sell = thresholds.sell,
            success_prob,
            %signal,
            "evaluated"
        );

        Ok(SignalEvaluation {
            signal,
            rsi,
            volatility,
            thresholds,
            rows,
        })
    }

    fn checked_success_prob(&self, success_prob: Option<f64>) -> Option<f64> {
        match success_prob {
            Some(p) if !(0.0..=1.0).contains(&p) => {
                warn!(
                    stage = %Stage::Signal,
                    strategy = self.strategy.as_str(),
                    success_prob = p,
                    "success probability outside [0, 1]; ignoring"
                );
                None
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use chrono::{Duration, TimeZone, Utc};

    fn candles_from(closes: &[f64]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: start + Duration::hours(4 * i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect()
    }

    fn declining(n: usize) -> Vec<f64> {
        let step = 60.0 / (n - 1) as f64;
        (0..n).map(|i| 100.0 - step * i as f64).collect()
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn declining_prices_buy() {
        let candles = candles_from(&declining(60));
        for generator in [RsiSignalGenerator::momentum(), RsiSignalGenerator::trend()] {
            let eval = generator.evaluate(candles.as_slice(), None, None).unwrap();
            assert_eq!(eval.rsi, 0.0);
            assert!(eval.volatility > 0.0);
            assert_eq!(eval.signal, Signal::Buy);
        }
    }

    #[test]
    fn rising_prices_sell() {
        let candles = candles_from(&rising(60));
        let eval = RsiSignalGenerator::momentum()
            .evaluate(candles.as_slice(), None, None)
            .unwrap();
        assert_eq!(eval.rsi, 100.0);
        assert_eq!(eval.signal, Signal::Sell);
    }

    #[test]
    fn short_table_is_none() {
        let candles = candles_from(&declining(49));
        for strategy in Strategy::ALL {
            let generator = RsiSignalGenerator::for_strategy(strategy);
            assert_eq!(generator.signal(candles.as_slice(), None, None), Signal::None);
            assert!(matches!(
                generator.evaluate(candles.as_slice(), None, None),
                Err(PipelineError::InsufficientData { .. })
            ));
        }
    }

    #[test]
    fn volatility_variant_uses_market_snapshot() {
        let candles = candles_from(&declining(60));
        let market = MarketConditions::new(2.0, 0.1);
        let eval = RsiSignalGenerator::volatility()
            .evaluate(candles.as_slice(), Some(&market), None)
            .unwrap();
        assert_eq!(eval.volatility, 2.0);
        assert_eq!(eval.thresholds, RsiThresholds { buy: 55.0, sell: 45.0 });

        let eval = RsiSignalGenerator::volatility()
            .evaluate(candles.as_slice(), None, None)
            .unwrap();
        assert_eq!(eval.volatility, 0.0);
        assert_eq!(eval.signal, Signal::Buy);
    }

    #[test]
    fn volatility_variant_rejects_undefined_close() {
        let mut closes = declining(60);
        closes[59] = f64::NAN;
        let candles = candles_from(&closes);
        assert!(matches!(
            RsiSignalGenerator::volatility().evaluate(candles.as_slice(), None, None),
            Err(PipelineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn volatility_variant_rejects_undefined_returns() {
        // 0 / 0 at every step: no return is defined.
        let candles = candles_from(&[0.0; 60]);
        let err = RsiSignalGenerator::volatility()
            .evaluate(candles.as_slice(), None, None)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { .. }), "{err}");
        assert!(err.to_string().contains("every return is undefined"));
        assert_eq!(
            RsiSignalGenerator::volatility().signal(candles.as_slice(), None, None),
            Signal::None
        );
    }

    #[test]
    fn volatility_variant_rejects_flat_rsi() {
        // Flat closes: every gain and loss is zero, so RSI is undefined throughout.
        let candles = candles_from(&[100.0; 60]);
        assert!(matches!(
            RsiSignalGenerator::volatility().evaluate(candles.as_slice(), None, None),
            Err(PipelineError::InsufficientData { .. })
        ));
        assert_eq!(
            RsiSignalGenerator::momentum().signal(candles.as_slice(), None, None),
            Signal::None
        );
    }

    #[test]
    fn high_confidence_widens_buy_region() {
        let candles = candles_from(&declining(60));
        let base = RsiSignalGenerator::momentum()
            .evaluate(candles.as_slice(), None, None)
            .unwrap();
        let confident = RsiSignalGenerator::momentum()
            .evaluate(candles.as_slice(), None, Some(0.8))
            .unwrap();
        assert!(confident.thresholds.buy <= base.thresholds.buy * 0.9 + 1e-12);
        assert!(confident.thresholds.sell >= base.thresholds.sell * 1.1 - 1e-12);
    }

    #[test]
    fn out_of_range_success_prob_is_ignored() {
        let candles = candles_from(&declining(60));
        let generator = RsiSignalGenerator::trend();
        let base = generator.evaluate(candles.as_slice(), None, None).unwrap();
        for p in [1.5, -0.2, f64::NAN] {
            let eval = generator.evaluate(candles.as_slice(), None, Some(p)).unwrap();
            assert_eq!(eval.thresholds, base.thresholds, "{p}");
        }
    }

    #[test]
    fn missing_close_column_is_none() {
        let table = crate::signals::ColumnTable::new()
            .with_column("open", vec![1.0; 60])
            .unwrap();
        let generator = RsiSignalGenerator::trend();
        assert!(matches!(
            generator.evaluate(&table, None, None),
            Err(PipelineError::MissingColumn(_))
        ));
        assert_eq!(generator.signal(&table, None, None), Signal::None);
    }

    #[test]
    fn strategy_parses() {
        assert_eq!("Momentum".parse::<Strategy>().unwrap(), Strategy::Momentum);
        assert_eq!(" volatility ".parse::<Strategy>().unwrap(), Strategy::Volatility);
        assert!("scalping".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Trend.to_string(), "trend");
    }
}
