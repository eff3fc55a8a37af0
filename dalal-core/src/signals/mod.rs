//! Signal votes: each indicator reduced to one directional opinion.
//!
//! Vote rules see bar history and precomputed indicator values only. Every
//! call is a pure function of its inputs; nothing is remembered between calls.
//! Missing or undefined indicator values always produce a neutral vote.

pub mod ma_crossover;
pub mod macd_cross;
pub mod recommendation;
pub mod rsi;

pub use ma_crossover::MaCrossoverRule;
pub use macd_cross::MacdCrossRule;
pub use recommendation::{confidence, Recommendation};
pub use rsi::RsiRule;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AnalysisConfig;
use crate::domain::Bar;
use crate::indicators::IndicatorValues;

/// Directional opinion of a single indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalVote {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

impl SignalVote {
    /// +1, 0 or -1.
    pub fn value(self) -> i32 {
        match self {
            SignalVote::Bullish => 1,
            SignalVote::Neutral => 0,
            SignalVote::Bearish => -1,
        }
    }

    pub fn from_value(value: i32) -> Self {
        match value.signum() {
            1 => SignalVote::Bullish,
            -1 => SignalVote::Bearish,
            _ => SignalVote::Neutral,
        }
    }
}

impl fmt::Display for SignalVote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalVote::Bullish => "Buy Signal",
            SignalVote::Neutral => "Neutral",
            SignalVote::Bearish => "Sell Signal",
        };
        f.write_str(label)
    }
}

/// Trait for vote rules.
///
/// `vote` is evaluated at `bar_index` and must only read data up to and
/// including that bar.
pub trait VoteRule: Send + Sync {
    /// Rule name, also the key used in reports (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Bars needed before the rule can vote anything but neutral.
    fn warmup_bars(&self) -> usize;

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> SignalVote;
}

/// The three votes behind a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalVotes {
    pub ma_crossover: SignalVote,
    pub rsi: SignalVote,
    pub macd: SignalVote,
}

impl SignalVotes {
    pub fn new(ma_crossover: SignalVote, rsi: SignalVote, macd: SignalVote) -> Self {
        Self {
            ma_crossover,
            rsi,
            macd,
        }
    }

    /// Sum of the votes, in -3..=3.
    pub fn sum(&self) -> i32 {
        self.ma_crossover.value() + self.rsi.value() + self.macd.value()
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_sum(self.sum())
    }

    pub fn confidence(&self) -> f64 {
        confidence(self.sum())
    }

    /// (rule name, vote) pairs in report order.
    pub fn named(&self) -> [(&'static str, SignalVote); 3] {
        [
            (ma_crossover::NAME, self.ma_crossover),
            (rsi::NAME, self.rsi),
            (macd_cross::NAME, self.macd),
        ]
    }
}

/// The standard rule set, parameterised by the analysis config.
pub struct SignalGenerator {
    ma_crossover: MaCrossoverRule,
    rsi: RsiRule,
    macd: MacdCrossRule,
}

impl SignalGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        let ind = &config.indicators;
        let sig = &config.signals;
        Self {
            ma_crossover: MaCrossoverRule::new(ind.sma_fast, ind.sma_slow),
            rsi: RsiRule::new(ind.rsi, sig.rsi_oversold, sig.rsi_overbought),
            macd: MacdCrossRule::new(),
        }
    }

    /// Votes at the last bar. An empty series votes neutral across the board.
    pub fn votes(&self, bars: &[Bar], indicators: &IndicatorValues) -> SignalVotes {
        let Some(last) = bars.len().checked_sub(1) else {
            return SignalVotes::default();
        };
        self.votes_at(bars, last, indicators)
    }

    pub fn votes_at(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> SignalVotes {
        SignalVotes {
            ma_crossover: self.ma_crossover.vote(bars, bar_index, indicators),
            rsi: self.rsi.vote(bars, bar_index, indicators),
            macd: self.macd.vote(bars, bar_index, indicators),
        }
    }

    pub fn rules(&self) -> [&dyn VoteRule; 3] {
        [&self.ma_crossover, &self.rsi, &self.macd]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_values() {
        assert_eq!(SignalVote::Bullish.value(), 1);
        assert_eq!(SignalVote::Neutral.value(), 0);
        assert_eq!(SignalVote::Bearish.value(), -1);
        assert_eq!(SignalVote::from_value(7), SignalVote::Bullish);
        assert_eq!(SignalVote::from_value(-2), SignalVote::Bearish);
        assert_eq!(SignalVote::from_value(0), SignalVote::Neutral);
    }

    #[test]
    fn votes_sum_and_recommend() {
        use SignalVote::*;
        let all_bull = SignalVotes::new(Bullish, Bullish, Bullish);
        assert_eq!(all_bull.sum(), 3);
        assert_eq!(all_bull.recommendation(), Recommendation::StrongBuy);
        assert_eq!(all_bull.confidence(), 100.0);

        let none = SignalVotes::default();
        assert_eq!(none.recommendation(), Recommendation::Hold);
        assert_eq!(none.confidence(), 0.0);

        let split = SignalVotes::new(Bullish, Neutral, Bearish);
        assert_eq!(split.sum(), 0);
        assert_eq!(split.recommendation(), Recommendation::Hold);
        assert_eq!(split.confidence(), 0.0);
    }

    #[test]
    fn vote_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_string(&SignalVote::Bullish).unwrap(),
            "\"BULLISH\""
        );
    }

    #[test]
    fn empty_series_votes_neutral() {
        let generator = SignalGenerator::new(&AnalysisConfig::default());
        let votes = generator.votes(&[], &IndicatorValues::new());
        assert_eq!(votes, SignalVotes::default());
    }

    #[test]
    fn rule_names_match_report_keys() {
        let generator = SignalGenerator::new(&AnalysisConfig::default());
        let names: Vec<&str> = generator.rules().iter().map(|r| r.name()).collect();
        let keys: Vec<&str> = SignalVotes::default().named().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, keys);
    }
}
