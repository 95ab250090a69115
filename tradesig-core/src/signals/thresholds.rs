//! Adaptive RSI buy/sell thresholds.

use crate::config::SignalParams;
use crate::domain::Signal;
use serde::{Deserialize, Serialize};

/// RSI levels below which to buy and above which to sell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub buy: f64,
    pub sell: f64,
}

impl RsiThresholds {
    /// Base thresholds widened (or, for negative volatility, narrowed) by
    /// `volatility * volatility_scale`.
    pub fn from_volatility(volatility: f64, params: &SignalParams) -> Self {
        let shift = volatility * params.volatility_scale;
        Self {
            buy: params.base_buy + shift,
            sell: params.base_sell - shift,
        }
    }

    /// Scale for model confidence. High confidence lowers the buy level and
    /// raises the sell level; low confidence does the opposite. `None`, or a
    /// value inside the confidence band, leaves the thresholds unchanged.
    pub fn adjust_for_success(self, success_prob: Option<f64>, params: &SignalParams) -> Self {
        match success_prob {
            Some(p) if p > params.high_confidence => Self {
                buy: self.buy * params.aggressive_buy_factor,
                sell: self.sell * params.aggressive_sell_factor,
            },
            Some(p) if p < params.low_confidence => Self {
                buy: self.buy * params.conservative_buy_factor,
                sell: self.sell * params.conservative_sell_factor,
            },
            _ => self,
        }
    }

    /// Buy strictly below `buy`, sell strictly above `sell`, otherwise none.
    /// An undefined RSI never trades.
    pub fn decide(&self, rsi: f64) -> Signal {
        if rsi < self.buy {
            Signal::Buy
        } else if rsi > self.sell {
            Signal::Sell
        } else {
            Signal::None
        }
    }
}
