//! Support and resistance levels from local extremes of the close.
//!
//! A close that equals the maximum of its centered window is a resistance
//! candidate; one that equals the minimum is a support candidate. Ties inside a
//! window are all kept. Only the most recent `max_levels` of each kind survive,
//! listed oldest first so the last entry is the freshest level.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::indicators::rolling::{centered_rolling_max, centered_rolling_min};

/// Default centered window width.
pub const DEFAULT_LEVEL_WINDOW: usize = 20;
/// Default number of levels kept per side.
pub const DEFAULT_MAX_LEVELS: usize = 5;

/// A candidate price level and the bar it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl SupportResistance {
    pub fn support_prices(&self) -> Vec<f64> {
        self.support.iter().map(|l| l.price).collect()
    }

    pub fn resistance_prices(&self) -> Vec<f64> {
        self.resistance.iter().map(|l| l.price).collect()
    }

    /// Highest support strictly below `price`, if any.
    pub fn nearest_support(&self, price: f64) -> Option<f64> {
        self.support
            .iter()
            .map(|l| l.price)
            .filter(|&p| p < price)
            .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.max(p))))
    }

    /// Lowest resistance strictly above `price`, if any.
    pub fn nearest_resistance(&self, price: f64) -> Option<f64> {
        self.resistance
            .iter()
            .map(|l| l.price)
            .filter(|&p| p > price)
            .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.min(p))))
    }
}

/// Indices of resistance and support candidates, oldest first, before capping.
pub fn extreme_indices(closes: &[f64], window: usize) -> (Vec<usize>, Vec<usize>) {
    let highs = centered_rolling_max(closes, window);
    let lows = centered_rolling_min(closes, window);

    let resistance = (0..closes.len())
        .filter(|&i| !highs[i].is_nan() && closes[i] == highs[i])
        .collect();
    let support = (0..closes.len())
        .filter(|&i| !lows[i].is_nan() && closes[i] == lows[i])
        .collect();

    (resistance, support)
}

/// Locate the most recent support and resistance levels of a series.
///
/// A series shorter than `window` has no levels yet; that is not an error.
pub fn find_levels(series: &PriceSeries, window: usize, max_levels: usize) -> SupportResistance {
    let closes = series.closes();
    let (resistance, support) = extreme_indices(&closes, window);

    let to_levels = |indices: Vec<usize>| -> Vec<Level> {
        let skip = indices.len().saturating_sub(max_levels);
        indices
            .into_iter()
            .skip(skip)
            .map(|i| Level {
                date: series.bars()[i].date,
                price: closes[i],
            })
            .collect()
    };

    SupportResistance {
        support: to_levels(support),
        resistance: to_levels(resistance),
    }
}
