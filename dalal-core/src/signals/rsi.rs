//! RSI mean-reversion vote.
//!
//! Oversold (RSI below the lower threshold) votes bullish on the expectation
//! of a bounce; overbought (above the upper threshold) votes bearish. The
//! direction of RSI itself is ignored. This convention is not backed by any
//! backtest.

use super::{SignalVote, VoteRule};
use crate::domain::Bar;
use crate::indicators::IndicatorValues;

pub const NAME: &str = "rsi";

/// # Indicator dependencies
/// - `rsi_{period}` (e.g., `rsi_14`)
#[derive(Debug, Clone)]
pub struct RsiRule {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    key: String,
}

impl RsiRule {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        Self {
            period,
            oversold,
            overbought,
            key: format!("rsi_{period}"),
        }
    }
}

impl Default for RsiRule {
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl VoteRule for RsiRule {
    fn name(&self) -> &str {
        NAME
    }

    fn warmup_bars(&self) -> usize {
        self.period + 1
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> SignalVote {
        if bar_index >= bars.len() {
            return SignalVote::Neutral;
        }

        match indicators.get(&self.key, bar_index) {
            Some(rsi) if rsi < self.oversold => SignalVote::Bullish,
            Some(rsi) if rsi > self.overbought => SignalVote::Bearish,
            // NaN fails both comparisons and lands here too.
            _ => SignalVote::Neutral,
        }
    }
}
