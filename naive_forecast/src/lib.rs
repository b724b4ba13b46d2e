//! # Naive Forecast
//!
//! A forecasting inference engine built on naive models.
//!
//! ## Features
//!
//! - Single-series and batch requests, answered in the same shape
//! - Point forecasts from the last, first, mean or median observation
//! - Quantile bands scaled by the history's standard deviation, with either
//!   Monte Carlo or analytic standard-normal z-scores
//! - Future timestamps for hourly, 15/30-minute, daily, weekly and calendar
//!   monthly frequencies
//!
//! ## Quick Start
//!
//! ```rust
//! use naive_forecast::{EngineConfig, ForecastService, PredictRequest, Prediction};
//! use naive_forecast::config::{NaiveStrategy, QuantileMethod};
//!
//! let config = EngineConfig::default()
//!     .with_strategy(NaiveStrategy::Mean)
//!     .with_quantile_method(QuantileMethod::Analytic);
//! let service = ForecastService::new(&config);
//!
//! let request: PredictRequest = serde_json::from_str(r#"{
//!     "history": [
//!         {"ts": "2024-01-01T00:00:00", "value": 10.0},
//!         {"ts": "2024-01-01T01:00:00", "value": 14.0}
//!     ],
//!     "horizon": 3
//! }"#)?;
//!
//! let response = service.predict(request)?;
//! if let Prediction::Single(records) = &response.prediction {
//!     assert_eq!(records.len(), 3);
//!     assert_eq!(records[0].ts, "2024-01-01T02:00:00");
//!     assert_eq!(records[0].value, 12.0);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod quantiles;
pub mod response;
pub mod service;
pub mod timestamps;

// Re-export commonly used types
pub use crate::config::EngineConfig;
pub use crate::data::{History, Observation, Series};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ForecastModel, NaiveForecaster, SeriesForecast};
pub use crate::quantiles::QuantileLevel;
pub use crate::response::{ForecastRecord, Prediction};
pub use crate::service::{ForecastService, HealthStatus, PredictRequest, PredictResponse};
pub use crate::timestamps::{Frequency, Timestamp};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
