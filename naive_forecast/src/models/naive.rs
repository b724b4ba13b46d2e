//! Naive forecasting: a summary statistic of the history, held flat

use crate::config::{EngineConfig, NaiveStrategy, QuantileMethod};
use crate::data::Series;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, SeriesForecast};
use crate::quantiles::QuantileLevel;
use crate::timestamps::Frequency;
use forecast_math::{analytic_z_score, mean, median, sampled_z_score_with, std_dev};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Name reported by the naive model and the health check
pub const MODEL_NAME: &str = "naive-forecast";

/// Naive forecaster
///
/// The point forecast is one summary statistic of the history repeated over
/// the horizon. The quantile band offsets it by `z * std_dev`, where `z` is
/// the standard-normal score of each level.
#[derive(Debug, Clone)]
pub struct NaiveForecaster {
    /// Name of the model
    name: String,
    /// Statistic used as the point forecast
    strategy: NaiveStrategy,
    /// z-score estimator
    quantile_method: QuantileMethod,
    /// Draws per Monte Carlo estimate
    sample_size: usize,
}

impl NaiveForecaster {
    /// Create a forecaster from the engine configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            name: MODEL_NAME.to_string(),
            strategy: config.strategy,
            quantile_method: config.quantile_method,
            sample_size: config.sample_size,
        }
    }

    pub fn strategy(&self) -> NaiveStrategy {
        self.strategy
    }

    pub fn quantile_method(&self) -> QuantileMethod {
        self.quantile_method
    }

    /// Point forecast of the values under the configured strategy
    ///
    /// An empty history forecasts 0.0.
    pub fn point_forecast(&self, values: &[f64]) -> Result<f64> {
        let (first, last) = match (values.first(), values.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Ok(0.0),
        };

        let point = match self.strategy {
            NaiveStrategy::Last => last,
            NaiveStrategy::First => first,
            NaiveStrategy::Mean => mean(values)?,
            NaiveStrategy::Median => median(values)?,
        };

        if !point.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "{} strategy produced a non-finite forecast",
                self.strategy
            )));
        }
        Ok(point)
    }

    /// Value of each quantile level around `point`
    ///
    /// With fewer than two observations there is no spread to scale, so
    /// every level equals the point forecast.
    pub fn quantile_values<R: Rng>(
        &self,
        values: &[f64],
        point: f64,
        levels: &[QuantileLevel],
        rng: &mut R,
    ) -> Result<BTreeMap<QuantileLevel, f64>> {
        if values.len() < 2 {
            return Ok(levels.iter().map(|&level| (level, point)).collect());
        }

        let spread = std_dev(values)?;
        if !spread.is_finite() {
            return Err(ForecastError::ComputationError(
                "Standard deviation of the history is not finite".to_string(),
            ));
        }

        let mut band = BTreeMap::new();
        for &level in levels {
            let q = level.value();
            let value = if level.is_median() {
                point
            } else {
                let offset = self.z_score(q, rng)? * spread;
                if q < 0.5 {
                    point - offset
                } else {
                    point + offset
                }
            };

            if !value.is_finite() {
                return Err(ForecastError::ComputationError(format!(
                    "Quantile {} is not finite",
                    level
                )));
            }
            band.insert(level, value);
        }

        Ok(band)
    }

    fn z_score<R: Rng>(&self, level: f64, rng: &mut R) -> Result<f64> {
        let z = match self.quantile_method {
            QuantileMethod::MonteCarlo => sampled_z_score_with(level, self.sample_size, rng)?,
            QuantileMethod::Analytic => analytic_z_score(level)?,
        };
        Ok(z)
    }

    /// Forecast one series drawing Monte Carlo samples from `rng`
    pub fn predict_with_rng<R: Rng>(
        &self,
        series: &Series,
        horizon: usize,
        levels: &[QuantileLevel],
        rng: &mut R,
    ) -> Result<SeriesForecast> {
        if horizon == 0 {
            return Err(ForecastError::ValidationError(
                "Horizon must be positive".to_string(),
            ));
        }

        let values = series.values();
        let point = self.point_forecast(&values)?;
        let band = self.quantile_values(&values, point, levels, rng)?;

        debug!(
            strategy = %self.strategy,
            observations = values.len(),
            horizon,
            point,
            "Computed naive forecast"
        );

        SeriesForecast::constant(point, band, horizon)
    }
}

impl Default for NaiveForecaster {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ForecastModel for NaiveForecaster {
    fn name(&self) -> &str {
        &self.name
    }

    /// The naive model is frequency-independent; `freq` only affects the
    /// timestamps attached by the caller.
    fn predict(
        &self,
        series: &Series,
        horizon: usize,
        _freq: Frequency,
        levels: &[QuantileLevel],
    ) -> Result<SeriesForecast> {
        self.predict_with_rng(series, horizon, levels, &mut rand::thread_rng())
    }
}
