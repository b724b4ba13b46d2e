//! Assembly of forecast records from timestamps, values and quantile bands

use crate::data::Shape;
use crate::error::{ForecastError, Result};
use crate::models::SeriesForecast;
use crate::quantiles::QuantileLevel;
use crate::timestamps::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One forecasted point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub ts: String,
    pub value: f64,
    #[serde(default)]
    pub probabilistic_values: BTreeMap<QuantileLevel, f64>,
}

/// Forecast records in the shape of the request history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Batch(Vec<Vec<ForecastRecord>>),
    Single(Vec<ForecastRecord>),
}

impl Prediction {
    /// Wrap per-series records back into the request's shape
    pub fn from_shape(shape: Shape, mut records: Vec<Vec<ForecastRecord>>) -> Result<Self> {
        match shape {
            Shape::Batch => Ok(Prediction::Batch(records)),
            Shape::Single if records.len() == 1 => Ok(Prediction::Single(records.remove(0))),
            Shape::Single => Err(ForecastError::ComputationError(format!(
                "Single-series request produced {} forecasts",
                records.len()
            ))),
        }
    }

    /// Records per series, in request order
    pub fn series(&self) -> Vec<&[ForecastRecord]> {
        match self {
            Prediction::Batch(all) => all.iter().map(Vec::as_slice).collect(),
            Prediction::Single(records) => vec![records.as_slice()],
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Prediction::Batch(_))
    }
}

/// Zip timestamps with a series forecast into records
///
/// A quantile sequence shorter than the horizon repeats its last value.
pub fn assemble_records(timestamps: &[Timestamp], forecast: &SeriesForecast) -> Vec<ForecastRecord> {
    timestamps
        .iter()
        .zip(forecast.forecasts())
        .enumerate()
        .map(|(i, (ts, &value))| {
            let probabilistic_values = forecast
                .quantiles()
                .iter()
                .filter_map(|(&level, values)| {
                    values.get(i).or_else(|| values.last()).map(|&v| (level, v))
                })
                .collect();

            ForecastRecord {
                ts: ts.to_string(),
                value,
                probabilistic_values,
            }
        })
        .collect()
}
