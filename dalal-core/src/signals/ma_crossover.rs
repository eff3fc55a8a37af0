//! Moving average trend vote.
//!
//! Bullish while the fast SMA sits above the slow SMA at the evaluated bar,
//! bearish while it sits below. This is a level comparison, not a crossover
//! event: the vote holds for as long as the ordering does.

use super::{SignalVote, VoteRule};
use crate::domain::Bar;
use crate::indicators::IndicatorValues;

pub const NAME: &str = "ma_crossover";

/// Fast/slow SMA ordering rule.
///
/// # Indicator dependencies
/// - Fast: `sma_{fast_period}` (e.g., `sma_20`)
/// - Slow: `sma_{slow_period}` (e.g., `sma_50`)
#[derive(Debug, Clone)]
pub struct MaCrossoverRule {
    pub fast_period: usize,
    pub slow_period: usize,
    fast_key: String,
    slow_key: String,
}

impl MaCrossoverRule {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            fast_key: format!("sma_{fast_period}"),
            slow_key: format!("sma_{slow_period}"),
        }
    }
}

impl Default for MaCrossoverRule {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

impl VoteRule for MaCrossoverRule {
    fn name(&self) -> &str {
        NAME
    }

    fn warmup_bars(&self) -> usize {
        self.fast_period.max(self.slow_period)
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> SignalVote {
        if bar_index >= bars.len() || bar_index + 1 < self.warmup_bars() {
            return SignalVote::Neutral;
        }

        let (Some(fast), Some(slow)) = (
            indicators.get(&self.fast_key, bar_index),
            indicators.get(&self.slow_key, bar_index),
        ) else {
            return SignalVote::Neutral;
        };

        if fast.is_nan() || slow.is_nan() {
            return SignalVote::Neutral;
        }

        if fast > slow {
            SignalVote::Bullish
        } else if fast < slow {
            SignalVote::Bearish
        } else {
            SignalVote::Neutral
        }
    }
}
