//! Summary statistics over a slice of observations
//!
//! Contains the statistics the naive models are built from:
//! - Mean and median
//! - Population standard deviation
//! - Percentiles with linear interpolation between order statistics

use crate::{MathError, Result};

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of the values
///
/// For an even number of values this is the mean of the two middle values.
pub fn median(values: &[f64]) -> Result<f64> {
    let sorted = sorted_copy(values)?;
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Population standard deviation (divisor `n`)
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;

    let variance = values
        .iter()
        .map(|&value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    Ok(variance.sqrt())
}

/// Percentile of the values, `pct` in `[0, 100]`
///
/// Interpolates linearly between the two nearest order statistics, so the
/// 0th percentile is the minimum and the 100th is the maximum.
pub fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(MathError::InvalidInput(format!(
            "Percentile must be between 0 and 100, got {}",
            pct
        )));
    }

    let sorted = sorted_copy(values)?;
    Ok(percentile_of_sorted(&sorted, pct))
}

pub(crate) fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

fn sorted_copy(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot order an empty series".to_string(),
        ));
    }
    if values.iter().any(|v| v.is_nan()) {
        return Err(MathError::InvalidInput(
            "Series contains NaN values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}
