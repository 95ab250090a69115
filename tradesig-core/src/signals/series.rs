//! Inputs a signal generator can read closes from.

use crate::domain::Candle;
use crate::error::{PipelineError, Stage};
use crate::features::FeatureTable;
use std::collections::BTreeMap;

/// Anything with an ordered close column.
pub trait CloseSeries {
    fn row_count(&self) -> usize;

    /// Closes, oldest first. Fails when the input has no close column.
    fn closes(&self) -> Result<Vec<f64>, PipelineError>;
}

impl CloseSeries for [Candle] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn closes(&self) -> Result<Vec<f64>, PipelineError> {
        Ok(self.iter().map(|c| c.close).collect())
    }
}

impl CloseSeries for Vec<Candle> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn closes(&self) -> Result<Vec<f64>, PipelineError> {
        self.as_slice().closes()
    }
}

impl CloseSeries for FeatureTable {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn closes(&self) -> Result<Vec<f64>, PipelineError> {
        Ok(FeatureTable::closes(self))
    }
}

/// A named-column numeric table, e.g. a candle frame handed over by an
/// outer layer. Every column has the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
}

impl ColumnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column. The first column fixes the row count; a
    /// later column of a different length is rejected.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, PipelineError> {
        let name = name.into();
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(PipelineError::computation(
                Stage::Signal,
                format!(
                    "column '{name}' has {} rows, table has {}",
                    values.len(),
                    self.rows
                ),
            ));
        }
        self.rows = values.len();
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl From<&[Candle]> for ColumnTable {
    fn from(candles: &[Candle]) -> Self {
        let pick = |f: fn(&Candle) -> f64| candles.iter().map(f).collect::<Vec<_>>();
        let mut columns = BTreeMap::new();
        columns.insert("open".to_string(), pick(|c| c.open));
        columns.insert("high".to_string(), pick(|c| c.high));
        columns.insert("low".to_string(), pick(|c| c.low));
        columns.insert("close".to_string(), pick(|c| c.close));
        columns.insert("volume".to_string(), pick(|c| c.volume));
        Self {
            columns,
            rows: candles.len(),
        }
    }
}

impl CloseSeries for ColumnTable {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn closes(&self) -> Result<Vec<f64>, PipelineError> {
        self.column("close")
            .map(<[f64]>::to_vec)
            .ok_or_else(|| PipelineError::MissingColumn("close".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_table_requires_close() {
        let table = ColumnTable::new()
            .with_column("open", vec![1.0, 2.0])
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert!(matches!(
            table.closes(),
            Err(PipelineError::MissingColumn(name)) if name == "close"
        ));
    }

    #[test]
    fn column_table_rejects_ragged_columns() {
        let err = ColumnTable::new()
            .with_column("open", vec![1.0, 2.0])
            .unwrap()
            .with_column("close", vec![1.0])
            .unwrap_err();
        assert!(err.to_string().contains("'close' has 1 rows"));
    }

    #[test]
    fn column_table_from_candles() {
        use chrono::{TimeZone, Utc};
        let candles = vec![Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        }];
        let table = ColumnTable::from(candles.as_slice());
        assert_eq!(table.closes().unwrap(), vec![1.5]);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["close", "high", "low", "open", "volume"]
        );
    }
}
