//! Feature building: candles and trade history into one feature table.
//!
//! Stages, in order: fetch (candles and trades, concurrently), indicators,
//! trade aggregation, merge. Any stage that comes up empty makes the whole
//! build absent, except the trade side, where no history just means no
//! trade columns.

pub mod builder;
pub mod compute;
pub mod merge;
pub mod table;
pub mod trades;

pub use builder::FeatureBuilder;
pub use compute::{indicator_rows, warmup_rows};
pub use merge::merge_trade_features;
pub use table::{FeatureRow, FeatureTable, TradeFeatures};
pub use trades::{aggregate_trades, TradeAggregation, TradeBuckets};
