//! # Forecast Math
//!
//! Numeric building blocks for naive forecasting.
//! This crate provides the summary statistics used as point forecasts and the
//! standard-normal helpers used to turn a spread into quantile offsets.

use thiserror::Error;

pub mod normal;
pub mod statistics;

pub use normal::{
    analytic_z_score, sampled_z_score, sampled_z_score_with, STANDARD_SAMPLE_SIZE,
};
pub use statistics::{mean, median, percentile, std_dev};

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
