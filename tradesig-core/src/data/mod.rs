//! Candle and trade-log sources.

pub mod file;
pub mod memory;
pub mod source;
pub mod synthetic;

pub use file::{CsvCandleSource, JsonTradeLog};
pub use memory::{FailingSource, MemoryCandleSource, MemoryTradeLog};
pub use source::{CandleSource, SourceError, TradeLogSource};
pub use synthetic::SyntheticCandleSource;
