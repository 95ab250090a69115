//! Market condition snapshot supplied by the surrounding bot.

use serde::{Deserialize, Serialize};

/// Market-wide summary statistics, computed elsewhere and read-only here.
///
/// Either field may be missing; consumers fall back to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    #[serde(default)]
    pub avg_volatility: Option<f64>,
    #[serde(default)]
    pub avg_drop: Option<f64>,
}

impl MarketConditions {
    pub fn new(avg_volatility: f64, avg_drop: f64) -> Self {
        Self {
            avg_volatility: Some(avg_volatility),
            avg_drop: Some(avg_drop),
        }
    }

    pub fn avg_volatility_or_zero(&self) -> f64 {
        self.avg_volatility.unwrap_or(0.0)
    }
}
