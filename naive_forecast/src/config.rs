//! Engine configuration, fixed once at process start

use crate::error::{ForecastError, Result};
use crate::quantiles::QuantileLevel;
use forecast_math::STANDARD_SAMPLE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Environment variable selecting the point-forecast strategy
pub const STRATEGY_ENV: &str = "NAIVE_STRATEGY";
/// Environment variable selecting the z-score method
pub const QUANTILE_METHOD_ENV: &str = "NAIVE_QUANTILE_METHOD";
/// Environment variable overriding the Monte Carlo batch size
pub const SAMPLE_SIZE_ENV: &str = "NAIVE_SAMPLE_SIZE";

/// Summary statistic used as the point forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NaiveStrategy {
    /// Last observed value
    #[default]
    Last,
    /// Arithmetic mean of the history
    Mean,
    /// Median of the history
    Median,
    /// First observed value
    First,
}

impl FromStr for NaiveStrategy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(NaiveStrategy::Last),
            "mean" => Ok(NaiveStrategy::Mean),
            "median" => Ok(NaiveStrategy::Median),
            "first" => Ok(NaiveStrategy::First),
            other => Err(ForecastError::ValidationError(format!(
                "Unknown naive strategy '{}', expected last, mean, median or first",
                other
            ))),
        }
    }
}

impl fmt::Display for NaiveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NaiveStrategy::Last => "last",
            NaiveStrategy::Mean => "mean",
            NaiveStrategy::Median => "median",
            NaiveStrategy::First => "first",
        };
        f.write_str(name)
    }
}

/// How the z-score of a quantile level is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantileMethod {
    /// Percentile of a fresh batch of standard-normal draws; not reproducible
    #[default]
    MonteCarlo,
    /// Closed-form inverse normal CDF; deterministic
    Analytic,
}

impl FromStr for QuantileMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "monte_carlo" | "montecarlo" | "sampled" => Ok(QuantileMethod::MonteCarlo),
            "analytic" | "exact" => Ok(QuantileMethod::Analytic),
            other => Err(ForecastError::ValidationError(format!(
                "Unknown quantile method '{}', expected monte_carlo or analytic",
                other
            ))),
        }
    }
}

impl fmt::Display for QuantileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantileMethod::MonteCarlo => f.write_str("monte_carlo"),
            QuantileMethod::Analytic => f.write_str("analytic"),
        }
    }
}

/// Immutable settings shared by every request served by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Point-forecast strategy
    pub strategy: NaiveStrategy,
    /// z-score estimator for the quantile band
    pub quantile_method: QuantileMethod,
    /// Draws per Monte Carlo estimate
    pub sample_size: usize,
    /// Levels used when a request does not specify any
    pub quantile_levels: Vec<QuantileLevel>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: NaiveStrategy::default(),
            quantile_method: QuantileMethod::default(),
            sample_size: STANDARD_SAMPLE_SIZE,
            quantile_levels: QuantileLevel::defaults(),
        }
    }
}

impl EngineConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// Unknown or malformed values are logged and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(STRATEGY_ENV) {
            match raw.parse() {
                Ok(strategy) => config.strategy = strategy,
                Err(e) => warn!(value = %raw, "{}; using '{}'", e, config.strategy),
            }
        }

        if let Some(raw) = lookup(QUANTILE_METHOD_ENV) {
            match raw.parse() {
                Ok(method) => config.quantile_method = method,
                Err(e) => warn!(value = %raw, "{}; using '{}'", e, config.quantile_method),
            }
        }

        if let Some(raw) = lookup(SAMPLE_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.sample_size = size,
                _ => warn!(
                    value = %raw,
                    "Invalid {}; using {}",
                    SAMPLE_SIZE_ENV,
                    config.sample_size
                ),
            }
        }

        config
    }

    /// Set the point-forecast strategy
    pub fn with_strategy(mut self, strategy: NaiveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the z-score method
    pub fn with_quantile_method(mut self, method: QuantileMethod) -> Self {
        self.quantile_method = method;
        self
    }

    /// Set the Monte Carlo batch size
    pub fn with_sample_size(mut self, sample_size: usize) -> Result<Self> {
        if sample_size == 0 {
            return Err(ForecastError::ValidationError(
                "Sample size must be positive".to_string(),
            ));
        }
        self.sample_size = sample_size;
        Ok(self)
    }

    /// Set the default quantile levels
    pub fn with_quantile_levels(mut self, levels: Vec<QuantileLevel>) -> Result<Self> {
        if levels.is_empty() {
            return Err(ForecastError::ValidationError(
                "At least one default quantile level is required".to_string(),
            ));
        }
        self.quantile_levels = QuantileLevel::normalize_set(&levels);
        Ok(self)
    }
}
