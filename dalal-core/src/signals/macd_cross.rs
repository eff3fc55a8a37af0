//! MACD crossover vote.
//!
//! Fires only on the bar where the MACD line crosses its signal line:
//! bullish when MACD moves from <= signal to > signal, bearish on the mirror
//! move. Every other bar, including the bars after a cross, is neutral.

use super::{SignalVote, VoteRule};
use crate::domain::Bar;
use crate::indicators::IndicatorValues;

pub const NAME: &str = "macd";

/// Series key of the MACD line.
pub const MACD_KEY: &str = "macd";
/// Series key of the MACD signal line.
pub const SIGNAL_KEY: &str = "macd_signal";

#[derive(Debug, Clone, Default)]
pub struct MacdCrossRule;

impl MacdCrossRule {
    pub fn new() -> Self {
        Self
    }
}

impl VoteRule for MacdCrossRule {
    fn name(&self) -> &str {
        NAME
    }

    fn warmup_bars(&self) -> usize {
        2
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> SignalVote {
        // Need the previous bar for crossover detection.
        if bar_index == 0 || bar_index >= bars.len() {
            return SignalVote::Neutral;
        }

        let values = (
            indicators.get(MACD_KEY, bar_index),
            indicators.get(SIGNAL_KEY, bar_index),
            indicators.get(MACD_KEY, bar_index - 1),
            indicators.get(SIGNAL_KEY, bar_index - 1),
        );
        let (Some(macd_cur), Some(signal_cur), Some(macd_prev), Some(signal_prev)) = values else {
            return SignalVote::Neutral;
        };

        if macd_cur.is_nan() || signal_cur.is_nan() || macd_prev.is_nan() || signal_prev.is_nan() {
            return SignalVote::Neutral;
        }

        if macd_prev <= signal_prev && macd_cur > signal_cur {
            SignalVote::Bullish
        } else if macd_prev >= signal_prev && macd_cur < signal_cur {
            SignalVote::Bearish
        } else {
            SignalVote::Neutral
        }
    }
}
