//! Standard-normal z-scores for quantile levels
//!
//! Two estimators of `|Phi^-1(q)|`:
//! - Monte Carlo: the q-th percentile of a batch of standard-normal draws
//! - Analytic: the closed-form inverse CDF from `statrs`

use crate::statistics::percentile_of_sorted;
use crate::{MathError, Result};
use rand::Rng;
use rand_distr::StandardNormal;
use statrs::distribution::{ContinuousCDF, Normal};

/// Number of draws per Monte Carlo estimate
pub const STANDARD_SAMPLE_SIZE: usize = 10_000;

fn validate_level(level: f64) -> Result<()> {
    if !level.is_finite() || level <= 0.0 || level >= 1.0 {
        return Err(MathError::InvalidInput(format!(
            "Quantile level must be strictly between 0 and 1, got {}",
            level
        )));
    }
    Ok(())
}

/// Estimate `|Phi^-1(level)|` by sampling with a fresh thread-local RNG
///
/// Results differ between calls; use [`sampled_z_score_with`] with a seeded
/// generator when reproducibility matters.
pub fn sampled_z_score(level: f64, samples: usize) -> Result<f64> {
    sampled_z_score_with(level, samples, &mut rand::thread_rng())
}

/// Estimate `|Phi^-1(level)|` from `samples` standard-normal draws of `rng`
pub fn sampled_z_score_with<R: Rng>(level: f64, samples: usize, rng: &mut R) -> Result<f64> {
    validate_level(level)?;
    if samples == 0 {
        return Err(MathError::InsufficientData(
            "Sample batch must contain at least one draw".to_string(),
        ));
    }

    let mut draws: Vec<f64> = (0..samples)
        .map(|_| rng.sample::<f64, _>(StandardNormal))
        .collect();
    draws.sort_by(f64::total_cmp);

    Ok(percentile_of_sorted(&draws, level * 100.0).abs())
}

/// Exact `|Phi^-1(level)|` via the standard normal inverse CDF
pub fn analytic_z_score(level: f64) -> Result<f64> {
    validate_level(level)?;

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| MathError::CalculationError(format!("Standard normal: {}", e)))?;
    let z = normal.inverse_cdf(level);

    if !z.is_finite() {
        return Err(MathError::CalculationError(format!(
            "Inverse CDF is not finite at {}",
            level
        )));
    }

    Ok(z.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(0.9, 1.281_551_565_5)]
    #[case(0.1, 1.281_551_565_5)]
    #[case(0.975, 1.959_963_984_5)]
    #[case(0.5, 0.0)]
    fn test_analytic_z_score(#[case] level: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(analytic_z_score(level).unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_sampled_z_score_close_to_analytic() {
        let mut rng = StdRng::seed_from_u64(42);
        for level in [0.1, 0.25, 0.75, 0.9] {
            let sampled = sampled_z_score_with(level, STANDARD_SAMPLE_SIZE, &mut rng).unwrap();
            let exact = analytic_z_score(level).unwrap();
            assert_abs_diff_eq!(sampled, exact, epsilon = 0.1);
        }
    }

    #[test]
    fn test_sampled_z_score_is_reproducible_with_seed() {
        let a = sampled_z_score_with(0.8, 500, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = sampled_z_score_with(0.8, 500, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampled_z_score_is_non_negative() {
        let z = sampled_z_score(0.3, 1_000).unwrap();
        assert!(z >= 0.0 && z.is_finite());
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.2)]
    #[case(f64::NAN)]
    fn test_invalid_levels(#[case] level: f64) {
        assert!(analytic_z_score(level).is_err());
        assert!(sampled_z_score(level, 10).is_err());
    }

    #[test]
    fn test_empty_sample_batch() {
        let result = sampled_z_score(0.9, 0);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }
}
