//! Forecasting models for time series data

use crate::data::Series;
use crate::error::{ForecastError, Result};
use crate::quantiles::QuantileLevel;
use crate::timestamps::Frequency;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Forecast of one series: point values plus a quantile band per level
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesForecast {
    /// Point forecast for each horizon step
    forecasts: Vec<f64>,
    /// Estimated value per quantile level for each horizon step
    quantiles: BTreeMap<QuantileLevel, Vec<f64>>,
}

impl SeriesForecast {
    /// Create a new series forecast
    ///
    /// Every quantile sequence must be non-empty; a sequence shorter than the
    /// horizon is tolerated and clamped to its last value on assembly.
    pub fn new(forecasts: Vec<f64>, quantiles: BTreeMap<QuantileLevel, Vec<f64>>) -> Result<Self> {
        if let Some((level, _)) = quantiles.iter().find(|(_, values)| values.is_empty()) {
            return Err(ForecastError::ComputationError(format!(
                "Quantile {} has no values",
                level
            )));
        }

        Ok(Self {
            forecasts,
            quantiles,
        })
    }

    /// Replicate a point value and per-level values across `horizon` steps
    pub fn constant(point: f64, levels: BTreeMap<QuantileLevel, f64>, horizon: usize) -> Result<Self> {
        let quantiles = levels
            .into_iter()
            .map(|(level, value)| (level, vec![value; horizon]))
            .collect();
        Self::new(vec![point; horizon], quantiles)
    }

    /// Get the forecasted values
    pub fn forecasts(&self) -> &[f64] {
        &self.forecasts
    }

    /// Get the quantile sequences keyed by level
    pub fn quantiles(&self) -> &BTreeMap<QuantileLevel, Vec<f64>> {
        &self.quantiles
    }

    /// Number of forecasted steps
    pub fn horizon(&self) -> usize {
        self.forecasts.len()
    }
}

/// Common interface for forecasting models
///
/// Implementations hold only immutable configuration, so one instance can
/// serve concurrent requests.
pub trait ForecastModel: Debug + Send + Sync {
    /// Name of the model
    fn name(&self) -> &str;

    /// Forecast `horizon` steps of one series with a band for each level
    fn predict(
        &self,
        series: &Series,
        horizon: usize,
        freq: Frequency,
        levels: &[QuantileLevel],
    ) -> Result<SeriesForecast>;
}

pub mod naive;

pub use naive::NaiveForecaster;
