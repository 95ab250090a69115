//! Left merge of indicator rows with trade buckets.

use super::table::{FeatureRow, TradeFeatures};
use super::trades::TradeBuckets;
use crate::domain::Timeframe;

/// Attach trade columns to every row, keyed on the row timestamp floored to
/// `timeframe`. Rows with no bucket get zeros. Merged rows carry the floored
/// timestamp.
///
/// With no buckets at all the rows are returned untouched, with their raw
/// timestamps and no trade columns.
pub fn merge_trade_features(
    mut rows: Vec<FeatureRow>,
    buckets: &TradeBuckets,
    timeframe: Timeframe,
) -> Vec<FeatureRow> {
    if buckets.is_empty() {
        return rows;
    }

    for row in &mut rows {
        let key = timeframe.floor(row.timestamp);
        row.trade = Some(buckets.get(&key).copied().unwrap_or(TradeFeatures::ZERO));
        row.timestamp = key;
    }
    rows
}
