//! Error types for the naive_forecast crate

use forecast_math::MathError;
use serde::Serialize;
use thiserror::Error;

/// Custom error types for the naive_forecast crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Malformed request: empty history, empty series, bad horizon or level
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A history timestamp could not be read as a date-time
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unexpected numeric or calendar failure while forecasting
    #[error("Computation error: {0}")]
    ComputationError(String),
}

/// Coarse classification of a [`ForecastError`], for mapping onto transport
/// status codes at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Parse,
    Computation,
}

impl ForecastError {
    /// The kind of failure this error represents
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::ValidationError(_) => ErrorKind::Validation,
            ForecastError::ParseError(_) => ErrorKind::Parse,
            ForecastError::ComputationError(_) => ErrorKind::Computation,
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ComputationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_errors_become_computation_errors() {
        let err = ForecastError::from(MathError::InsufficientData("empty".to_string()));
        assert_eq!(err.kind(), ErrorKind::Computation);
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_error_display() {
        let err = ForecastError::ParseError("'yesterday' is not a timestamp".to_string());
        assert_eq!(
            err.to_string(),
            "Parse error: 'yesterday' is not a timestamp"
        );
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
