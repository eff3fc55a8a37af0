//! Headline price figures for the top of a stock page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOverview {
    pub date: NaiveDate,
    pub last_close: f64,
    /// Last close minus previous close; 0 with a single bar.
    pub change: f64,
    /// Change as a percentage of the previous close; 0 when that close is 0.
    pub change_pct: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: u64,
    /// Highest high over the whole series.
    pub period_high: f64,
    /// Lowest low over the whole series.
    pub period_low: f64,
}

impl PriceOverview {
    /// `None` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let bars = series.bars();
        let last = bars.last()?;
        let previous_close = match bars.len() {
            0 | 1 => last.close,
            n => bars[n - 2].close,
        };

        let change = last.close - previous_close;
        let change_pct = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        let period_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let period_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        Some(Self {
            date: last.date,
            last_close: last.close,
            change,
            change_pct,
            day_high: last.high,
            day_low: last.low,
            volume: last.volume,
            period_high,
            period_low,
        })
    }

    pub fn is_up(&self) -> bool {
        self.change > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn empty_series_has_no_overview() {
        assert!(PriceOverview::from_series(&PriceSeries::default()).is_none());
    }

    #[test]
    fn change_against_previous_close() {
        let series = PriceSeries::new("TCS.NS", make_bars(&[100.0, 110.0, 104.5]));
        let ov = PriceOverview::from_series(&series).unwrap();
        assert_approx(ov.change, -5.5, DEFAULT_EPSILON);
        assert_approx(ov.change_pct, -5.0, DEFAULT_EPSILON);
        assert!(!ov.is_up());
        assert_eq!(ov.last_close, 104.5);
        // make_bars puts high/low one point around the bar range
        assert_eq!(ov.period_high, 111.0);
        assert_eq!(ov.period_low, 99.0);
        assert_eq!(ov.volume, 1000);
    }

    #[test]
    fn single_bar_has_zero_change() {
        let series = PriceSeries::new("TCS.NS", make_bars(&[100.0]));
        let ov = PriceOverview::from_series(&series).unwrap();
        assert_eq!(ov.change, 0.0);
        assert_eq!(ov.change_pct, 0.0);
    }
}
