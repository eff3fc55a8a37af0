//! Full indicator set for one series, keyed by name.
//!
//! This is what the vote rules read and what a chart layer draws: price
//! overlays (SMAs, EMA, Bollinger) plus the RSI, MACD, Stochastic and volume
//! panels.

use crate::config::AnalysisConfig;
use crate::domain::PriceSeries;
use crate::indicators::{
    bollinger_of_series, macd_of_series, stochastic_of_series, Ema, Indicator, IndicatorValues,
    Rsi, Sma, VolumeSma,
};
use crate::signals::macd_cross::{MACD_KEY, SIGNAL_KEY};

pub const MACD_HISTOGRAM_KEY: &str = "macd_histogram";
pub const BB_UPPER_KEY: &str = "bb_upper";
pub const BB_MIDDLE_KEY: &str = "bb_middle";
pub const BB_LOWER_KEY: &str = "bb_lower";
pub const STOCH_K_KEY: &str = "stoch_k";
pub const STOCH_D_KEY: &str = "stoch_d";

/// Names of the single-series indicators for a config, in panel order.
pub struct SeriesKeys {
    pub sma_fast: String,
    pub sma_slow: String,
    pub ema: String,
    pub rsi: String,
    pub volume_sma: String,
}

impl SeriesKeys {
    pub fn new(config: &AnalysisConfig) -> Self {
        let ind = &config.indicators;
        Self {
            sma_fast: Sma::new(ind.sma_fast).name().to_string(),
            sma_slow: Sma::new(ind.sma_slow).name().to_string(),
            ema: Ema::new(ind.ema).name().to_string(),
            rsi: Rsi::new(ind.rsi).name().to_string(),
            volume_sma: VolumeSma::new(ind.volume_sma).name().to_string(),
        }
    }
}

/// Compute every configured indicator over the series.
pub fn compute_indicators(series: &PriceSeries, config: &AnalysisConfig) -> IndicatorValues {
    let ind = &config.indicators;
    let bars = series.bars();
    let closes = series.closes();

    let mut values = IndicatorValues::new();

    let single: [Box<dyn Indicator>; 5] = [
        Box::new(Sma::new(ind.sma_fast)),
        Box::new(Sma::new(ind.sma_slow)),
        Box::new(Ema::new(ind.ema)),
        Box::new(Rsi::new(ind.rsi)),
        Box::new(VolumeSma::new(ind.volume_sma)),
    ];
    for indicator in &single {
        values.insert(indicator.name(), indicator.compute(bars));
    }

    let macd = macd_of_series(&closes, ind.macd_fast, ind.macd_slow, ind.macd_signal);
    values.insert(MACD_KEY, macd.macd);
    values.insert(SIGNAL_KEY, macd.signal);
    values.insert(MACD_HISTOGRAM_KEY, macd.histogram);

    let bands = bollinger_of_series(&closes, ind.bollinger_period, ind.bollinger_k);
    values.insert(BB_UPPER_KEY, bands.upper);
    values.insert(BB_MIDDLE_KEY, bands.middle);
    values.insert(BB_LOWER_KEY, bands.lower);

    let stoch = stochastic_of_series(
        &series.highs(),
        &series.lows(),
        &closes,
        ind.stochastic_k,
        ind.stochastic_d,
    );
    values.insert(STOCH_K_KEY, stoch.k);
    values.insert(STOCH_D_KEY, stoch.d);

    values
}
