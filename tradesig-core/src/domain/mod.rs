//! Domain types for the feature and signal pipeline.

pub mod candle;
pub mod market;
pub mod signal;
pub mod timeframe;
pub mod trade;

pub use candle::Candle;
pub use market::MarketConditions;
pub use signal::Signal;
pub use timeframe::{Timeframe, TimeframeError};
pub use trade::{RawTimestamp, TradeRecord, TradeSide};
