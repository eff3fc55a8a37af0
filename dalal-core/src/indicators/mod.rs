//! Indicator library.
//!
//! Each indicator is available two ways: as a slice function over raw values
//! (`sma_of_series`, `rsi_of_series`, ...) and, for single-series indicators,
//! as an `Indicator` implementation over `&[Bar]`. Outputs always have the
//! input's length; positions whose window has not filled yet are `f64::NAN`.
//!
//! Multi-series indicators (MACD, Bollinger, Stochastic) return a struct of
//! aligned vectors instead of going through the single-series trait.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod values;
pub mod volume;

pub use bollinger::{bollinger_of_series, Bollinger, BollingerOutput};
pub use ema::{ema_of_series, Ema};
pub use macd::{macd_of_series, Macd, MacdOutput};
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{sma_of_series, Sma};
pub use stochastic::{stochastic_of_series, Stochastic, StochasticOutput};
pub use values::IndicatorValues;
pub use volume::{volume_sma, VolumeSma};

use crate::domain::Bar;

/// Trait for single-series indicators.
///
/// # Look-ahead guard
/// No value at bar t may depend on data from bar t+1 or later. Every
/// implementation must give identical results on a truncated series.
pub trait Indicator: Send + Sync {
    /// Series name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading positions that are `NaN` on a long enough series.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Last value of a series, or `None` when empty or undefined.
pub fn latest(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| v.is_finite())
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_skips_undefined_tail() {
        assert_eq!(latest(&[1.0, 2.0]), Some(2.0));
        assert_eq!(latest(&[1.0, f64::NAN]), None);
        assert_eq!(latest(&[]), None);
    }

    /// Every single-series indicator gives the same prefix on a truncated series.
    #[test]
    fn no_lookahead_on_truncation() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let full = make_bars(&closes);
        let cut = &full[..50];

        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Sma::new(20)),
            Box::new(Ema::new(12)),
            Box::new(Rsi::new(14)),
            Box::new(VolumeSma::new(20)),
        ];

        for ind in &indicators {
            let a = ind.compute(&full);
            let b = ind.compute(cut);
            for i in 0..cut.len() {
                if b[i].is_nan() {
                    assert!(a[i].is_nan(), "{} differs at {i}", ind.name());
                } else {
                    assert_approx(a[i], b[i], DEFAULT_EPSILON);
                }
            }
        }
    }
}
