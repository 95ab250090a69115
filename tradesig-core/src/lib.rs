//! TradeSig Core: market features and RSI trading signals.
//!
//! This crate contains the algorithmic core of the trading bot:
//! - Domain types (candles, trade records, market snapshots, signals)
//! - Pure indicator functions (RSI, EMA, MACD, Bollinger, returns, volatility)
//! - Source traits for candles and trade logs, with file, memory and synthetic implementations
//! - Feature builder: indicators + hourly trade buckets, left-merged per candle
//! - Signal generators: adaptive RSI thresholds (momentum, trend, volatility)
//!
//! Nothing here places orders or persists state.

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod indicators;
pub mod signals;

pub use config::{ConfigError, FeatureConfig, PipelineConfig, SignalParams};
pub use error::{PipelineError, Stage};
pub use features::{FeatureBuilder, FeatureRow, FeatureTable};
pub use signals::{RsiSignalGenerator, SignalGenerator, Strategy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed across threads is Send + Sync.
    ///
    /// Builders fetch on rayon's pool and generators may be shared between
    /// per-symbol workers. If any type fails this check, the build breaks.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::MarketConditions>();
        require_sync::<domain::MarketConditions>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();

        // Sources
        require_send::<data::MemoryCandleSource>();
        require_sync::<data::MemoryCandleSource>();
        require_send::<data::CsvCandleSource>();
        require_sync::<data::CsvCandleSource>();
        require_send::<data::JsonTradeLog>();
        require_sync::<data::JsonTradeLog>();
        require_send::<data::SyntheticCandleSource>();
        require_sync::<data::SyntheticCandleSource>();
        require_send::<data::SourceError>();

        // Pipeline
        require_send::<FeatureBuilder<data::MemoryCandleSource, data::MemoryTradeLog>>();
        require_sync::<FeatureBuilder<data::MemoryCandleSource, data::MemoryTradeLog>>();
        require_send::<FeatureTable>();
        require_sync::<FeatureTable>();
        require_send::<RsiSignalGenerator>();
        require_sync::<RsiSignalGenerator>();
        require_send::<PipelineError>();
        require_send::<PipelineConfig>();
        require_sync::<PipelineConfig>();
    }

    /// Architecture contract: generators see prices, never the builder or a
    /// source. The trait signature takes only a close series, an optional
    /// market snapshot and an optional probability.
    #[test]
    fn signal_generator_trait_takes_only_read_only_inputs() {
        fn _check_trait_object_builds(
            generator: &dyn SignalGenerator,
            table: &FeatureTable,
            market: &domain::MarketConditions,
        ) -> domain::Signal {
            generator.signal(table, Some(market), Some(0.5))
        }
    }
}
