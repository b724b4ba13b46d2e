//! Predict and health operations exposed to the transport layer

use crate::config::EngineConfig;
use crate::data::History;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, NaiveForecaster};
use crate::quantiles::QuantileLevel;
use crate::response::{assemble_records, ForecastRecord, Prediction};
use crate::timestamps::{generate, Frequency, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Frequency used when a request omits `freq`
pub const DEFAULT_FREQUENCY: &str = "h";

/// Largest accepted horizon, in steps
pub const MAX_HORIZON: i64 = 100_000;

/// Inbound predict request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// One series, or a list of series for batch mode
    pub history: History,
    /// Number of future points; must be positive
    pub horizon: i64,
    /// Frequency code, `h` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<String>,
    /// Quantile levels, the configured defaults when absent
    ///
    /// Kept as raw numbers so an out-of-range level surfaces from
    /// [`ForecastService::predict`] as a validation error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantile_levels: Option<Vec<f64>>,
}

impl PredictRequest {
    pub fn new(history: History, horizon: i64) -> Self {
        Self {
            history,
            horizon,
            freq: None,
            quantile_levels: None,
        }
    }

    pub fn with_freq(mut self, freq: impl Into<String>) -> Self {
        self.freq = Some(freq.into());
        self
    }

    pub fn with_quantile_levels(mut self, levels: Vec<QuantileLevel>) -> Self {
        self.quantile_levels = Some(levels.into_iter().map(QuantileLevel::value).collect());
        self
    }

    /// The horizon as a step count, rejecting zero, negatives and anything
    /// above [`MAX_HORIZON`]
    pub fn validated_horizon(&self) -> Result<usize> {
        if self.horizon <= 0 {
            return Err(ForecastError::ValidationError(format!(
                "Horizon must be positive, got {}",
                self.horizon
            )));
        }
        if self.horizon > MAX_HORIZON {
            return Err(ForecastError::ValidationError(format!(
                "Horizon must be at most {}, got {}",
                MAX_HORIZON, self.horizon
            )));
        }
        usize::try_from(self.horizon).map_err(|_| {
            ForecastError::ValidationError(format!("Horizon {} is too large", self.horizon))
        })
    }

    /// Resolved frequency, falling back to hourly
    pub fn frequency(&self) -> Frequency {
        Frequency::from_code(self.freq.as_deref().unwrap_or(DEFAULT_FREQUENCY))
    }

    /// Requested levels, validated, sorted and deduplicated
    pub fn levels(&self) -> Result<Option<Vec<QuantileLevel>>> {
        self.quantile_levels
            .as_ref()
            .map(|raw| {
                let levels = raw
                    .iter()
                    .map(|&level| QuantileLevel::new(level))
                    .collect::<Result<Vec<_>>>()?;
                Ok(QuantileLevel::normalize_set(&levels))
            })
            .transpose()
    }
}

/// Outbound predict response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Prediction,
}

/// Liveness payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model: String,
}

/// Forecast service: normalizes requests, runs the model per series and
/// assembles the response
///
/// Holds only immutable state; share it behind an `Arc` to serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct ForecastService<M: ForecastModel = NaiveForecaster> {
    model: M,
    default_levels: Vec<QuantileLevel>,
}

impl ForecastService<NaiveForecaster> {
    /// Build the naive forecast service from the startup configuration
    pub fn new(config: &EngineConfig) -> Self {
        info!(
            strategy = %config.strategy,
            quantile_method = %config.quantile_method,
            sample_size = config.sample_size,
            "Naive forecast service configured"
        );
        Self::with_model(NaiveForecaster::new(config), config.quantile_levels.clone())
    }
}

impl<M: ForecastModel> ForecastService<M> {
    /// Build a service around any forecasting model
    pub fn with_model(model: M, default_levels: Vec<QuantileLevel>) -> Self {
        let default_levels = if default_levels.is_empty() {
            QuantileLevel::defaults()
        } else {
            QuantileLevel::normalize_set(&default_levels)
        };
        Self {
            model,
            default_levels,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Quantile levels used when a request names none
    pub fn default_levels(&self) -> &[QuantileLevel] {
        &self.default_levels
    }

    /// Liveness check; performs no computation
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            model: self.model.name().to_string(),
        }
    }

    /// Forecast every series of the request
    ///
    /// The response has the same single/batch shape as the request history,
    /// with one record per horizon step for each series.
    pub fn predict(&self, request: PredictRequest) -> Result<PredictResponse> {
        let horizon = request.validated_horizon()?;
        let freq = request.frequency();
        let levels = request
            .levels()?
            .unwrap_or_else(|| self.default_levels.clone());

        let normalized = request.history.normalize()?;
        debug!(
            series = normalized.series.len(),
            horizon,
            freq = %freq,
            levels = levels.len(),
            "Predicting"
        );

        let records = normalized
            .series
            .iter()
            .enumerate()
            .map(|(index, series)| -> Result<Vec<ForecastRecord>> {
                let last = series.last().ok_or_else(|| {
                    ForecastError::ValidationError(format!("Series {} is empty", index))
                })?;
                let last_ts = Timestamp::parse(&last.ts)?;
                // Range check the final step before allocating anything horizon-sized
                freq.advance(last_ts.local(), horizon)?;
                let timestamps = generate(&last_ts, horizon, freq)?;
                let forecast = self.model.predict(series, horizon, freq, &levels)?;
                Ok(assemble_records(&timestamps, &forecast))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PredictResponse {
            prediction: Prediction::from_shape(normalized.shape, records)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuantileMethod;
    use crate::data::{Observation, Series};
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn service() -> ForecastService {
        ForecastService::new(&EngineConfig::default().with_quantile_method(QuantileMethod::Analytic))
    }

    fn series(points: &[(&str, f64)]) -> Series {
        Series::new(
            points
                .iter()
                .map(|&(ts, value)| Observation::new(ts, value))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_health() {
        assert_eq!(
            service().health(),
            HealthStatus {
                status: "healthy".to_string(),
                model: "naive-forecast".to_string(),
            }
        );
    }

    #[test]
    fn test_single_request_keeps_flat_shape() {
        let history = History::Single(series(&[
            ("2024-01-01T00:00:00", 1.0),
            ("2024-01-01T01:00:00", 3.0),
        ]));
        let response = service().predict(PredictRequest::new(history, 2)).unwrap();

        match response.prediction {
            Prediction::Single(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].ts, "2024-01-01T02:00:00");
                assert_eq!(records[1].ts, "2024-01-01T03:00:00");
                assert!(records.iter().all(|r| r.value == 3.0));
                assert_eq!(records[0].probabilistic_values.len(), 9);
            }
            other => panic!("expected a single prediction, got {:?}", other),
        }
    }

    #[test]
    fn test_requested_levels_replace_defaults() {
        let history = History::Single(series(&[("2024-01-01", 1.0), ("2024-01-02", 2.0)]));
        let levels = vec![
            QuantileLevel::new(0.95).unwrap(),
            QuantileLevel::new(0.05).unwrap(),
        ];
        let request = PredictRequest::new(history, 1)
            .with_freq("d")
            .with_quantile_levels(levels);

        let response = service().predict(request).unwrap();
        let records = response.prediction.series()[0].to_vec();
        let keys: Vec<String> = records[0]
            .probabilistic_values
            .keys()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["0.05", "0.95"]);
        assert_eq!(records[0].ts, "2024-01-03T00:00:00");
    }

    #[test]
    fn test_validation_errors() {
        let history = History::Single(series(&[("2024-01-01", 1.0)]));
        for horizon in [0, -3] {
            let err = service()
                .predict(PredictRequest::new(history.clone(), horizon))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        let err = service()
            .predict(PredictRequest::new(History::Batch(Vec::new()), 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_oversized_horizon_is_rejected() {
        let history = History::Single(series(&[("2024-01-01", 1.0)]));
        for horizon in [MAX_HORIZON + 1, i64::MAX] {
            let err = service()
                .predict(PredictRequest::new(history.clone(), horizon))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(service()
            .predict(PredictRequest::new(history, MAX_HORIZON))
            .is_ok());
    }

    #[test]
    fn test_horizon_past_calendar_range_is_a_computation_error() {
        let history = History::Single(series(&[("+262000-01-01T00:00:00", 1.0)]));
        let request = PredictRequest::new(history, MAX_HORIZON).with_freq("M");
        let err = service().predict(request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_out_of_range_level_is_a_validation_error() {
        let request: PredictRequest = serde_json::from_str(
            r#"{"history": [{"ts": "2024-01-01", "value": 1.0}],
                "horizon": 1,
                "quantile_levels": [0.5, 1.5]}"#,
        )
        .unwrap();
        let err = service().predict(request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_bad_timestamp_is_a_parse_error() {
        let history = History::Single(series(&[("2024-01-01", 1.0), ("last tuesday", 2.0)]));
        let err = service().predict(PredictRequest::new(history, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
