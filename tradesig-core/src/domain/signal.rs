//! Discrete trading decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of a signal generator: buy, sell, or stand aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    /// Numeric form consumed by the execution layer: 1, -1 or 0.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::None => 0,
        }
    }

    pub fn is_actionable(self) -> bool {
        !matches!(self, Signal::None)
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::None => "none",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values() {
        assert_eq!(Signal::Buy.value(), 1);
        assert_eq!(Signal::Sell.value(), -1);
        assert_eq!(i8::from(Signal::None), 0);
    }

    #[test]
    fn default_is_none() {
        assert_eq!(Signal::default(), Signal::None);
        assert!(!Signal::default().is_actionable());
        assert!(Signal::Sell.is_actionable());
    }
}
