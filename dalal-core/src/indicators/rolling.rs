//! Fixed-window rolling reductions over `f64` slices.
//!
//! Every function returns a vector the same length as its input. A position is
//! `NaN` until the window has filled, and any `NaN` inside a window makes that
//! position `NaN`. A zero window produces an all-`NaN` result.

/// Apply `reduce` to every full trailing window.
fn trailing<F>(values: &[f64], window: usize, reduce: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = reduce(slice);
    }

    result
}

/// Apply `reduce` to every full centered window.
///
/// The window at index `i` ends at `i + (window - 1) / 2`, so for an even
/// window the extra element sits on the left of `i`.
fn centered<F>(values: &[f64], window: usize, reduce: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    let offset = (window - 1) / 2;
    for (i, slot) in result.iter_mut().enumerate() {
        let end = i + offset;
        if end >= n || end + 1 < window {
            continue;
        }
        let slice = &values[end + 1 - window..=end];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        *slot = reduce(slice);
    }

    result
}

fn mean(slice: &[f64]) -> f64 {
    slice.iter().sum::<f64>() / slice.len() as f64
}

fn max(slice: &[f64]) -> f64 {
    slice.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min(slice: &[f64]) -> f64 {
    slice.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Sample standard deviation (divides by n - 1). A single value has zero spread.
fn sample_std(slice: &[f64]) -> f64 {
    if slice.len() < 2 {
        return 0.0;
    }
    let m = mean(slice);
    let variance =
        slice.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (slice.len() - 1) as f64;
    variance.sqrt()
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    trailing(values, window, mean)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    trailing(values, window, max)
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    trailing(values, window, min)
}

pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    trailing(values, window, sample_std)
}

pub fn centered_rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    centered(values, window, max)
}

pub fn centered_rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    centered(values, window, min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rolling_mean_warmup_is_nan() {
        let result = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_window_is_all_nan() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(centered_rolling_max(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rolling_min_max() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        let hi = rolling_max(&values, 2);
        let lo = rolling_min(&values, 2);
        assert_eq!(&hi[1..], &[3.0, 4.0, 4.0, 5.0]);
        assert_eq!(&lo[1..], &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn rolling_std_is_sample_std() {
        // mean 5, squared deviations 9+1+1+9 = 20, / 3
        let result = rolling_std(&[2.0, 4.0, 6.0, 8.0], 4);
        assert_approx(result[3], (20.0_f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_std_single_value_window_is_zero() {
        let result = rolling_std(&[2.0, 4.0], 1);
        assert_eq!(result, vec![0.0, 0.0]);
    }

    #[test]
    fn nan_in_window_poisons_only_that_window() {
        let result = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn centered_odd_window_is_symmetric() {
        // window 3 at i covers [i-1, i+1]
        let values = [1.0, 5.0, 2.0, 3.0, 0.0];
        let hi = centered_rolling_max(&values, 3);
        assert!(hi[0].is_nan());
        assert_eq!(hi[1], 5.0);
        assert_eq!(hi[2], 5.0);
        assert_eq!(hi[3], 3.0);
        assert!(hi[4].is_nan());
    }

    #[test]
    fn centered_even_window_leans_left() {
        // window 4 at i covers [i-2, i+1]
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let hi = centered_rolling_max(&values, 4);
        assert!(hi[0].is_nan());
        assert!(hi[1].is_nan());
        assert_eq!(hi[2], 4.0);
        assert_eq!(hi[3], 5.0);
        assert_eq!(hi[4], 6.0);
        assert!(hi[5].is_nan());
    }

    #[test]
    fn centered_shorter_than_window_is_all_nan() {
        let lo = centered_rolling_min(&[1.0, 2.0, 3.0], 5);
        assert!(lo.iter().all(|v| v.is_nan()));
    }
}
