//! PriceSeries: time-ordered bars for one instrument.
//!
//! The engine assumes a well-formed series (strictly increasing dates, positive
//! prices). `validate()` lets callers check that precondition before analysis;
//! indicator code never calls it.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::bar::Bar;

/// Structural problems with a price series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} ({date}) is not after the previous bar ({previous})")]
    NonMonotonicDates {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("duplicate bar for {date} at index {index}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) has a non-positive or non-finite price")]
    NonPositivePrice { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) has high below low or open/close outside the range")]
    InvertedRange { index: usize, date: NaiveDate },
}

/// Ordered daily bars for a single symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Wrap already-ordered bars. No validation is performed.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Check the ordering and price preconditions the engine relies on.
    ///
    /// Prices must be finite and positive.
    ///
    /// Returns the first violation found, scanning from the oldest bar.
    pub fn validate(&self) -> Result<(), SeriesError> {
        for (index, bar) in self.bars.iter().enumerate() {
            if bar.is_void() || bar.open <= 0.0 || bar.low <= 0.0 || bar.close <= 0.0 {
                return Err(SeriesError::NonPositivePrice {
                    index,
                    date: bar.date,
                });
            }
            if !bar.is_sane() {
                return Err(SeriesError::InvertedRange {
                    index,
                    date: bar.date,
                });
            }
            if index > 0 {
                let previous = self.bars[index - 1].date;
                if bar.date == previous {
                    return Err(SeriesError::DuplicateDate {
                        index,
                        date: bar.date,
                    });
                }
                if bar.date < previous {
                    return Err(SeriesError::NonMonotonicDates {
                        index,
                        date: bar.date,
                        previous,
                    });
                }
            }
        }
        Ok(())
    }

    /// Keep only the trailing `period` of history, measured back from the last bar.
    pub fn trailing(&self, period: Period) -> PriceSeries {
        let cutoff = match (self.last(), period.months()) {
            (Some(last), Some(months)) => last.date.checked_sub_months(Months::new(months)),
            _ => None,
        };

        let bars = match cutoff {
            Some(cutoff) => self
                .bars
                .iter()
                .filter(|b| b.date > cutoff)
                .copied()
                .collect(),
            None => self.bars.clone(),
        };

        PriceSeries::new(self.symbol.clone(), bars)
    }
}

/// Lookback period selector, using the same tokens as Yahoo Finance (`1mo`, `1y`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    fn months(self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::TwoYears => Some(24),
            Period::FiveYears => Some(60),
            Period::Max => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "max" => Ok(Period::Max),
            other => Err(format!(
                "unknown period '{other}' (expected 1mo, 3mo, 6mo, 1y, 2y, 5y or max)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, close: f64) -> Bar {
        Bar {
            date,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    fn daily(n: usize) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| bar(base + chrono::Duration::days(i as i64), 100.0 + i as f64))
            .collect();
        PriceSeries::new("TCS.NS", bars)
    }

    #[test]
    fn accessors_align_with_bars() {
        let series = daily(3);
        assert_eq!(series.closes(), vec![100.0, 101.0, 102.0]);
        assert_eq!(series.highs(), vec![101.0, 102.0, 103.0]);
        assert_eq!(series.lows(), vec![99.0, 100.0, 101.0]);
        assert_eq!(series.volumes(), vec![1000.0; 3]);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn validate_accepts_well_formed_series() {
        assert_eq!(daily(10).validate(), Ok(()));
        assert_eq!(PriceSeries::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_date() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = PriceSeries::new("X", vec![bar(d, 10.0), bar(d, 11.0)]);
        assert_eq!(
            series.validate(),
            Err(SeriesError::DuplicateDate { index: 1, date: d })
        );
    }

    #[test]
    fn validate_rejects_out_of_order_dates() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = PriceSeries::new("X", vec![bar(d1, 10.0), bar(d0, 11.0)]);
        assert!(matches!(
            series.validate(),
            Err(SeriesError::NonMonotonicDates { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_price() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut b = bar(d, 10.0);
        b.close = -1.0;
        let series = PriceSeries::new("X", vec![b]);
        assert!(matches!(
            series.validate(),
            Err(SeriesError::NonPositivePrice { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_infinite_price() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut b = bar(d, 10.0);
        b.close = f64::INFINITY;
        b.high = f64::INFINITY;
        let series = PriceSeries::new("X", vec![bar(d.pred_opt().unwrap(), 9.0), b]);
        assert_eq!(
            series.validate(),
            Err(SeriesError::NonPositivePrice { index: 1, date: d })
        );
    }

    #[test]
    fn trailing_keeps_recent_window() {
        let series = daily(400);
        let last = series.last().unwrap().date;
        let trimmed = series.trailing(Period::OneMonth);
        assert!(!trimmed.is_empty());
        assert_eq!(trimmed.last().unwrap().date, last);
        let cutoff = last.checked_sub_months(Months::new(1)).unwrap();
        assert!(trimmed.bars().iter().all(|b| b.date > cutoff));
        assert_eq!(series.trailing(Period::Max).len(), 400);
    }

    #[test]
    fn period_parses_yahoo_tokens() {
        assert_eq!("1y".parse::<Period>(), Ok(Period::OneYear));
        assert_eq!("6MO".parse::<Period>(), Ok(Period::SixMonths));
        assert!("weekly".parse::<Period>().is_err());
        assert_eq!(Period::FiveYears.to_string(), "5y");
    }
}
