//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + k * stddev(close, period)
//! - Lower: middle - k * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1); a one-bar window has zero width.
//! Lookback: period - 1.

use serde::{Deserialize, Serialize};

use super::rolling::{rolling_mean, rolling_std};
use crate::domain::Bar;

/// Aligned upper/middle/lower band series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bollinger {
    pub period: usize,
    pub multiplier: f64,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self { period, multiplier }
    }

    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn compute(&self, bars: &[Bar]) -> BollingerOutput {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        bollinger_of_series(&closes, self.period, self.multiplier)
    }
}

impl Default for Bollinger {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

pub fn bollinger_of_series(closes: &[f64], period: usize, multiplier: f64) -> BollingerOutput {
    let middle = rolling_mean(closes, period);
    let stddev = rolling_std(closes, period);

    let upper = middle
        .iter()
        .zip(&stddev)
        .map(|(m, s)| m + multiplier * s)
        .collect();
    let lower = middle
        .iter()
        .zip(&stddev)
        .map(|(m, s)| m - multiplier * s)
        .collect();

    BollingerOutput {
        upper,
        middle,
        lower,
    }
}
