//! Trailing-window statistics.
//!
//! Output has the same length as the input. Warmup: the first (window-1)
//! entries are NaN. If the input is shorter than the window every entry is NaN.

use super::{mean, standard_deviation};

fn rolling_apply(data: &[f64], window: usize, stat: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut result = vec![f64::NAN; data.len()];
    if window == 0 || data.len() < window {
        return result;
    }

    for (i, slot) in result.iter_mut().enumerate().skip(window - 1) {
        let start = i + 1 - window;
        *slot = stat(&data[start..=i]);
    }

    result
}

pub fn rolling_mean(data: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(data, window, mean)
}

/// Sample standard deviation over each trailing window. A window of 1 yields
/// NaN everywhere, since a single observation has no sample deviation.
pub fn rolling_std_dev(data: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(data, window, standard_deviation)
}

/// Deviations at or below this fraction of the values' magnitude are rounding
/// noise and count as zero.
pub const NEAR_ZERO_STD: f64 = 1e-9;

/// Z[i] = (X[i] - MEAN(n)[i]) / STD(n)[i]
///
/// NaN wherever the rolling standard deviation is not strictly positive
/// (including near-zero, see [`NEAR_ZERO_STD`]), and wherever the quotient
/// would not be finite.
pub fn rolling_z_score(data: &[f64], window: usize) -> Vec<f64> {
    rolling_z_score_scaled(data, window, 0.0)
}

/// Like [`rolling_z_score`], but a deviation also counts as zero when it is
/// within [`NEAR_ZERO_STD`] of `scale`. A difference of large numbers carries
/// rounding noise at the scale of its operands, not of its result.
pub fn rolling_z_score_scaled(data: &[f64], window: usize, scale: f64) -> Vec<f64> {
    let means = rolling_mean(data, window);
    let std_devs = rolling_std_dev(data, window);
    let magnitudes = rolling_apply(data, window, |w| {
        w.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
    });

    data.iter()
        .zip(means.iter().zip(std_devs.iter()))
        .zip(&magnitudes)
        .map(|((&value, (&m, &sd)), &magnitude)| {
            let floor = NEAR_ZERO_STD * magnitude.max(scale.abs());
            if sd > floor {
                let z = (value - m) / sd;
                if z.is_finite() { z } else { f64::NAN }
            } else {
                f64::NAN
            }
        })
        .collect()
}
