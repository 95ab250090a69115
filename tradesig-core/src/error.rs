//! Structured error types for the pipeline.
//!
//! Nothing here escapes the public `build`/`signal` entry points: those log
//! the error and degrade to "no table" / `Signal::None`. The fallible
//! `try_build`/`evaluate` variants return these so callers can see why.

use std::fmt;
use thiserror::Error;

use crate::data::SourceError;

/// Pipeline stage, carried in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Candles,
    Indicators,
    Trades,
    Merge,
    Signal,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Candles => "candles",
            Stage::Indicators => "indicators",
            Stage::Trades => "trades",
            Stage::Merge => "merge",
            Stage::Signal => "signal",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source returned nothing usable, or a stage filtered everything out.
    #[error("{stage}: no data for '{symbol}'")]
    DataUnavailable { stage: Stage, symbol: String },

    /// Input present but too short or too undefined to compute from.
    #[error("{stage}: insufficient data: {reason}")]
    InsufficientData { stage: Stage, reason: String },

    /// Malformed input or a numeric failure inside a stage.
    #[error("{stage}: computation failed: {reason}")]
    Computation { stage: Stage, reason: String },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("{stage}: source failed: {source}")]
    Source {
        stage: Stage,
        #[source]
        source: SourceError,
    },
}

impl PipelineError {
    pub fn unavailable(stage: Stage, symbol: &str) -> Self {
        Self::DataUnavailable {
            stage,
            symbol: symbol.to_string(),
        }
    }

    pub fn insufficient(stage: Stage, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            stage,
            reason: reason.into(),
        }
    }

    pub fn computation(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Computation {
            stage,
            reason: reason.into(),
        }
    }

    pub fn source(stage: Stage, source: SourceError) -> Self {
        Self::Source { stage, source }
    }

    /// Stage the error originated in, where known.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::DataUnavailable { stage, .. }
            | Self::InsufficientData { stage, .. }
            | Self::Computation { stage, .. }
            | Self::Source { stage, .. } => Some(*stage),
            Self::MissingColumn(_) => None,
        }
    }

    /// True for the "nothing usable to work with" family, logged at warn
    /// level. Everything else is a computation failure, logged at error level.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable { .. } | Self::InsufficientData { .. } | Self::Source { .. }
        )
    }
}
