//! Technical summary: the one report a display layer needs.
//!
//! Pure aggregation: picks the latest value of each indicator series, runs the
//! vote rules at the last bar and packages the support/resistance levels.
//! Never fails; an empty or short series produces a summary with `None`
//! values, neutral votes and a HOLD call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::domain::PriceSeries;
use crate::indicators::IndicatorValues;
use crate::levels::{find_levels, Level, SupportResistance};
use crate::overlays::{
    compute_indicators, SeriesKeys, BB_LOWER_KEY, BB_MIDDLE_KEY, BB_UPPER_KEY,
    MACD_HISTOGRAM_KEY, STOCH_D_KEY, STOCH_K_KEY,
};
use crate::signals::macd_cross::{MACD_KEY, SIGNAL_KEY};
use crate::signals::{Recommendation, SignalGenerator, SignalVotes};

/// Latest values of the secondary indicators, for the chart legend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: Option<f64>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub ema: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub stochastic_k: Option<f64>,
    pub stochastic_d: Option<f64>,
    pub volume_sma: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub symbol: String,
    /// Date of the last bar analysed.
    pub as_of: Option<NaiveDate>,
    pub bar_count: usize,
    pub recommendation: Recommendation,
    /// 0..=100.
    pub confidence: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    /// Oldest first, at most `levels.max_levels` entries.
    pub support_levels: Vec<Level>,
    /// Oldest first, at most `levels.max_levels` entries.
    pub resistance_levels: Vec<Level>,
    pub votes: SignalVotes,
    pub snapshot: IndicatorSnapshot,
}

impl TechnicalSummary {
    /// Summary for a series with no bars.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            as_of: None,
            bar_count: 0,
            recommendation: Recommendation::Hold,
            confidence: 0.0,
            rsi: None,
            macd: None,
            macd_signal: None,
            macd_histogram: None,
            support_levels: Vec::new(),
            resistance_levels: Vec::new(),
            votes: SignalVotes::default(),
            snapshot: IndicatorSnapshot::default(),
        }
    }

    pub fn levels(&self) -> SupportResistance {
        SupportResistance {
            support: self.support_levels.clone(),
            resistance: self.resistance_levels.clone(),
        }
    }
}

/// Analyze a series with the given config.
pub fn summarize(series: &PriceSeries, config: &AnalysisConfig) -> TechnicalSummary {
    TechnicalAnalyzer::new(config.clone()).summary(series)
}

/// Package already-computed pieces into a summary.
pub fn format_summary(
    series: &PriceSeries,
    config: &AnalysisConfig,
    indicators: &IndicatorValues,
    votes: SignalVotes,
    levels: SupportResistance,
) -> TechnicalSummary {
    let keys = SeriesKeys::new(config);

    TechnicalSummary {
        symbol: series.symbol.clone(),
        as_of: series.last().map(|b| b.date),
        bar_count: series.len(),
        recommendation: votes.recommendation(),
        confidence: votes.confidence(),
        rsi: indicators.latest(&keys.rsi),
        macd: indicators.latest(MACD_KEY),
        macd_signal: indicators.latest(SIGNAL_KEY),
        macd_histogram: indicators.latest(MACD_HISTOGRAM_KEY),
        support_levels: levels.support,
        resistance_levels: levels.resistance,
        votes,
        snapshot: IndicatorSnapshot {
            close: series.last().map(|b| b.close).filter(|c| c.is_finite()),
            sma_fast: indicators.latest(&keys.sma_fast),
            sma_slow: indicators.latest(&keys.sma_slow),
            ema: indicators.latest(&keys.ema),
            bollinger_upper: indicators.latest(BB_UPPER_KEY),
            bollinger_middle: indicators.latest(BB_MIDDLE_KEY),
            bollinger_lower: indicators.latest(BB_LOWER_KEY),
            stochastic_k: indicators.latest(STOCH_K_KEY),
            stochastic_d: indicators.latest(STOCH_D_KEY),
            volume_sma: indicators.latest(&keys.volume_sma),
        },
    }
}

/// Engine facade holding an analysis config.
///
/// Holds no per-request state, so one analyzer can serve any number of
/// independent series.
#[derive(Debug, Clone, Default)]
pub struct TechnicalAnalyzer {
    config: AnalysisConfig,
}

impl TechnicalAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Every configured indicator series, for charting or export.
    pub fn overlays(&self, series: &PriceSeries) -> IndicatorValues {
        compute_indicators(series, &self.config)
    }

    pub fn votes(&self, series: &PriceSeries) -> SignalVotes {
        let indicators = self.overlays(series);
        SignalGenerator::new(&self.config).votes(series.bars(), &indicators)
    }

    pub fn levels(&self, series: &PriceSeries) -> SupportResistance {
        find_levels(
            series,
            self.config.levels.window,
            self.config.levels.max_levels,
        )
    }

    pub fn summary(&self, series: &PriceSeries) -> TechnicalSummary {
        if series.is_empty() {
            debug!(symbol = %series.symbol, "empty series, returning empty summary");
            return TechnicalSummary::empty(series.symbol.clone());
        }

        let indicators = self.overlays(series);
        let votes = SignalGenerator::new(&self.config).votes(series.bars(), &indicators);
        let levels = self.levels(series);
        let summary = format_summary(series, &self.config, &indicators, votes, levels);

        debug!(
            symbol = %summary.symbol,
            bars = summary.bar_count,
            recommendation = %summary.recommendation,
            vote_sum = votes.sum(),
            "computed technical summary"
        );

        summary
    }
}
