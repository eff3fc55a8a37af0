//! Aggregate recommendation from the summed votes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall call derived from the vote sum (-3..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    #[default]
    Hold,
    Sell,
    StrongSell,
}

impl Recommendation {
    /// >= 2 strong buy, 1 buy, 0 hold, -1 sell, <= -2 strong sell.
    pub fn from_sum(sum: i32) -> Self {
        match sum {
            s if s >= 2 => Recommendation::StrongBuy,
            1 => Recommendation::Buy,
            0 => Recommendation::Hold,
            -1 => Recommendation::Sell,
            _ => Recommendation::StrongSell,
        }
    }

    pub fn is_buy(self) -> bool {
        matches!(self, Recommendation::StrongBuy | Recommendation::Buy)
    }

    pub fn is_sell(self) -> bool {
        matches!(self, Recommendation::StrongSell | Recommendation::Sell)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG_BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
            Recommendation::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence in percent: |sum| / 3 * 100, capped at 100; 0 for a zero sum.
pub fn confidence(sum: i32) -> f64 {
    if sum == 0 {
        return 0.0;
    }
    (sum.unsigned_abs() as f64 / 3.0 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn threshold_table() {
        assert_eq!(Recommendation::from_sum(3), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_sum(2), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_sum(1), Recommendation::Buy);
        assert_eq!(Recommendation::from_sum(0), Recommendation::Hold);
        assert_eq!(Recommendation::from_sum(-1), Recommendation::Sell);
        assert_eq!(Recommendation::from_sum(-2), Recommendation::StrongSell);
        assert_eq!(Recommendation::from_sum(-3), Recommendation::StrongSell);
    }

    #[test]
    fn confidence_scale() {
        assert_eq!(confidence(0), 0.0);
        assert_approx(confidence(1), 100.0 / 3.0, 1e-9);
        assert_approx(confidence(-2), 200.0 / 3.0, 1e-9);
        assert_eq!(confidence(3), 100.0);
        assert_eq!(confidence(-3), 100.0);
        assert_eq!(confidence(7), 100.0);
    }

    #[test]
    fn serializes_as_report_token() {
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongBuy).unwrap(),
            "\"STRONG_BUY\""
        );
        assert_eq!(Recommendation::StrongSell.to_string(), "STRONG_SELL");
        assert!(Recommendation::Buy.is_buy());
        assert!(Recommendation::Sell.is_sell());
        assert!(!Recommendation::Hold.is_buy());
    }
}
