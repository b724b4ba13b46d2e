//! # Naive Forecast Workspace
//!
//! Umbrella crate for the naive forecast service. It re-exports the
//! forecasting engine and its math helpers under one name.
//!
//! ## Example
//!
//! ```
//! use naive_forecast_workspace::{EngineConfig, ForecastService};
//!
//! let service = ForecastService::new(&EngineConfig::default());
//! let health = service.health();
//! assert_eq!(health.status, "healthy");
//! assert_eq!(health.model, "naive-forecast");
//! ```

pub use forecast_math;
pub use naive_forecast;

pub use naive_forecast::{
    EngineConfig, ForecastError, ForecastService, PredictRequest, PredictResponse, Prediction,
};

/// Forecast a single series of `(timestamp, value)` pairs with the default
/// configuration, returning `(timestamp, value)` pairs for the horizon.
///
/// # Examples
///
/// ```
/// use naive_forecast_workspace::quick_forecast;
///
/// let points = quick_forecast(&[("2024-01-01", 1.0), ("2024-01-02", 4.0)], 2, "d").unwrap();
/// assert_eq!(
///     points,
///     vec![
///         ("2024-01-03T00:00:00".to_string(), 4.0),
///         ("2024-01-04T00:00:00".to_string(), 4.0),
///     ]
/// );
/// ```
pub fn quick_forecast(
    points: &[(&str, f64)],
    horizon: i64,
    freq: &str,
) -> naive_forecast::Result<Vec<(String, f64)>> {
    use naive_forecast::{History, Observation, Series};

    let series = Series::new(
        points
            .iter()
            .map(|&(ts, value)| Observation::new(ts, value))
            .collect(),
    )?;
    let request = PredictRequest::new(History::Single(series), horizon).with_freq(freq);
    let response = ForecastService::new(&EngineConfig::default()).predict(request)?;

    Ok(response
        .prediction
        .series()
        .into_iter()
        .flatten()
        .map(|record| (record.ts.clone(), record.value))
        .collect())
}
