//! Request history: observations, series and single/batch normalization

use crate::error::{ForecastError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One historical sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Timestamp text as sent by the client
    pub ts: String,
    /// Observed value
    pub value: f64,
}

impl Observation {
    pub fn new(ts: impl Into<String>, value: f64) -> Self {
        Self {
            ts: ts.into(),
            value,
        }
    }
}

/// Chronological sequence of observations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Observation>);

impl Series {
    /// Create a series, rejecting an empty one
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::ValidationError(
                "Series must contain at least one observation".to_string(),
            ));
        }
        Ok(Self(observations))
    }

    /// The observations in order
    pub fn observations(&self) -> &[Observation] {
        &self.0
    }

    /// The observed values in order
    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|o| o.value).collect()
    }

    /// The most recent observation
    pub fn last(&self) -> Option<&Observation> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether a request carried one series or several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    Batch,
}

/// Request history in either accepted shape
///
/// On the wire a history is a JSON array; when its first element is itself
/// an array it decodes as [`History::Batch`], otherwise as
/// [`History::Single`]. An empty array decodes as an empty batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum History {
    Batch(Vec<Series>),
    Single(Series),
}

impl<'de> Deserialize<'de> for History {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;

        if items.is_empty() || items[0].is_array() {
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    Series::deserialize(item)
                        .map_err(|e| D::Error::custom(format!("series {}: {}", index, e)))
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(History::Batch)
        } else {
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    Observation::deserialize(item)
                        .map_err(|e| D::Error::custom(format!("observation {}: {}", index, e)))
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(|observations| History::Single(Series(observations)))
        }
    }
}

/// History resolved into an ordered list of series plus its original shape
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistory {
    pub shape: Shape,
    pub series: Vec<Series>,
}

impl History {
    /// Shape of the request
    pub fn shape(&self) -> Shape {
        match self {
            History::Batch(_) => Shape::Batch,
            History::Single(_) => Shape::Single,
        }
    }

    /// Whether the top-level sequence is empty
    pub fn is_empty(&self) -> bool {
        match self {
            History::Batch(series) => series.is_empty(),
            History::Single(series) => series.is_empty(),
        }
    }

    /// Resolve the history into a canonical sequence of non-empty series
    ///
    /// A single series becomes a one-element batch tagged [`Shape::Single`].
    pub fn normalize(self) -> Result<NormalizedHistory> {
        if self.is_empty() {
            return Err(ForecastError::ValidationError(
                "History must not be empty".to_string(),
            ));
        }

        let shape = self.shape();
        let series = match self {
            History::Batch(series) => series,
            History::Single(series) => vec![series],
        };

        if let Some(index) = series.iter().position(Series::is_empty) {
            return Err(ForecastError::ValidationError(format!(
                "Series {} in history is empty",
                index
            )));
        }

        Ok(NormalizedHistory { shape, series })
    }
}
