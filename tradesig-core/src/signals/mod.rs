//! Signal generation: RSI threshold decisions over a price table.
//!
//! Generators are pure: they read the table, hold no state, and never fail
//! outward. A cycle with nothing to say returns `Signal::None`.

pub mod generator;
pub mod series;
pub mod thresholds;

pub use generator::{RsiSignalGenerator, SignalEvaluation, Strategy, VolatilitySource};
pub use series::{CloseSeries, ColumnTable};
pub use thresholds::RsiThresholds;

use crate::domain::{MarketConditions, Signal};

/// Object-safe signal generator.
///
/// # Invariants
/// - `signal()` MUST NOT mutate or retain the table
/// - `signal()` MUST be deterministic for the same inputs
pub trait SignalGenerator: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    fn signal(
        &self,
        table: &dyn CloseSeries,
        market: Option<&MarketConditions>,
        success_prob: Option<f64>,
    ) -> Signal;
}

impl SignalGenerator for RsiSignalGenerator {
    fn name(&self) -> &str {
        self.strategy().as_str()
    }

    fn signal(
        &self,
        table: &dyn CloseSeries,
        market: Option<&MarketConditions>,
        success_prob: Option<f64>,
    ) -> Signal {
        RsiSignalGenerator::signal(self, table, market, success_prob)
    }
}

/// Momentum variant with default parameters.
pub fn generate_momentum_signal<S: CloseSeries + ?Sized>(
    table: &S,
    market: Option<&MarketConditions>,
    success_prob: Option<f64>,
) -> Signal {
    RsiSignalGenerator::momentum().signal(table, market, success_prob)
}

/// Trend variant with default parameters.
pub fn generate_trend_signal<S: CloseSeries + ?Sized>(
    table: &S,
    market: Option<&MarketConditions>,
    success_prob: Option<f64>,
) -> Signal {
    RsiSignalGenerator::trend().signal(table, market, success_prob)
}

/// Volatility variant with default parameters.
pub fn generate_volatility_signal<S: CloseSeries + ?Sized>(
    table: &S,
    market: Option<&MarketConditions>,
    success_prob: Option<f64>,
) -> Signal {
    RsiSignalGenerator::volatility().signal(table, market, success_prob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_usable_as_trait_objects() {
        let generators: Vec<Box<dyn SignalGenerator>> = Strategy::ALL
            .iter()
            .map(|&s| Box::new(RsiSignalGenerator::for_strategy(s)) as Box<dyn SignalGenerator>)
            .collect();
        let names: Vec<&str> = generators.iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["momentum", "trend", "volatility"]);

        let short = ColumnTable::new().with_column("close", vec![1.0; 10]).unwrap();
        for g in &generators {
            assert_eq!(g.signal(&short, None, None), Signal::None);
        }
    }
}
