//! Exponential Moving Average (EMA), span-weighted.
//!
//! alpha = 2 / (period + 1). Weights are bias-corrected:
//!
//!   EMA[t] = sum_i (1-alpha)^i * x[t-i] / sum_i (1-alpha)^i
//!
//! so the first defined input seeds the average directly instead of being
//! pulled toward an artificial zero. The average is defined from the first
//! non-NaN input onward (lookback 0 on a clean series).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// EMA over an arbitrary series.
///
/// Leading NaNs (an upstream warmup) stay NaN and the average starts at the
/// first defined value. A NaN after that taints every later position.
/// A zero period yields an all-NaN series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };

    // Bias-corrected weights: the value at i is sum(decay^k * x[i-k]) over
    // sum(decay^k). Updated incrementally so a constant input stays exact.
    let decay = 1.0 - 2.0 / (period as f64 + 1.0);
    let mut weight_total = 0.0;
    let mut ema = values[start];

    for i in start..n {
        let v = values[i];
        if v.is_nan() {
            return result;
        }
        weight_total = 1.0 + decay * weight_total;
        ema += (v - ema) / weight_total;
        result[i] = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_first_value_is_seeded_from_series() {
        let result = ema_of_series(&[250.0, 260.0], 12);
        assert_approx(result[0], 250.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, decay = 0.5
        // EMA[1] = (11 + 0.5*10) / 1.5 = 10.666...
        // EMA[2] = (12 + 0.5*11 + 0.25*10) / 1.75 = 20 / 1.75
        let result = ema_of_series(&[10.0, 11.0, 12.0], 3);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 16.0 / 1.5, DEFAULT_EPSILON);
        assert_approx(result[2], 20.0 / 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let result = ema_of_series(&[42.0; 30], 9);
        assert!(result.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn ema_skips_leading_nan() {
        let result = ema_of_series(&[f64::NAN, f64::NAN, 5.0, 5.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 5.0, DEFAULT_EPSILON);
        assert_approx(result[3], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_after_seed_propagates() {
        let result = ema_of_series(&[10.0, 11.0, f64::NAN, 13.0], 3);
        assert!(!result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
    }

    #[test]
    fn ema_zero_period_is_undefined() {
        assert!(ema_of_series(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_indicator_matches_series_fn() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(Ema::new(3).compute(&bars), ema_of_series(&closes, 3));
    }
}
