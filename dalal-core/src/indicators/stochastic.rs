//! Stochastic Oscillator.
//!
//! %K = 100 * (close - lowest_low(k)) / (highest_high(k) - lowest_low(k))
//! %D = SMA(%K, d)
//!
//! A window whose high and low coincide has no range; %K is pinned to 50
//! there instead of dividing by zero.
//! Lookback: k - 1 for %K, k + d - 2 for %D.

use serde::{Deserialize, Serialize};

use super::rolling::{rolling_max, rolling_min};
use super::sma::sma_of_series;
use crate::domain::Bar;

/// %K reported when the lookback window has zero range.
pub const FLAT_STOCHASTIC: f64 = 50.0;

/// Aligned %K and %D series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stochastic {
    pub k_period: usize,
    pub d_period: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }

    pub fn compute(&self, bars: &[Bar]) -> StochasticOutput {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        stochastic_of_series(&highs, &lows, &closes, self.k_period, self.d_period)
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new(14, 3)
    }
}

/// Stochastic over separate high/low/close slices of equal length.
pub fn stochastic_of_series(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticOutput {
    let highest = rolling_max(highs, k_period);
    let lowest = rolling_min(lows, k_period);

    let k: Vec<f64> = closes
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(&close, (&hi, &lo))| {
            if close.is_nan() || hi.is_nan() || lo.is_nan() {
                f64::NAN
            } else if hi == lo {
                FLAT_STOCHASTIC
            } else {
                (close - lo) / (hi - lo) * 100.0
            }
        })
        .collect();
    let d = sma_of_series(&k, d_period);

    StochasticOutput { k, d }
}
