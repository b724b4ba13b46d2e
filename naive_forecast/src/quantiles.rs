//! Quantile levels used as keys of the probabilistic forecast

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Levels produced when a request does not name its own
pub const DEFAULT_QUANTILE_LEVELS: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// A probability threshold strictly between 0 and 1
///
/// Renders as its shortest decimal text (`0.1`, `0.25`), which is also the
/// key used in serialized `probabilistic_values` maps. Levels order
/// numerically.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "LevelRepr")]
pub struct QuantileLevel(f64);

impl QuantileLevel {
    /// Create a level, rejecting values outside `(0, 1)`
    pub fn new(level: f64) -> Result<Self> {
        if !level.is_finite() || level <= 0.0 || level >= 1.0 {
            return Err(ForecastError::ValidationError(format!(
                "Quantile level must be strictly between 0 and 1, got {}",
                level
            )));
        }
        Ok(Self(level))
    }

    /// The underlying probability
    pub fn value(self) -> f64 {
        self.0
    }

    /// The median level, where the band collapses onto the point forecast
    pub fn is_median(self) -> bool {
        self.0 == 0.5
    }

    /// The default level set, 0.1 through 0.9
    pub fn defaults() -> Vec<Self> {
        DEFAULT_QUANTILE_LEVELS.iter().map(|&q| Self(q)).collect()
    }

    /// Sort and deduplicate a requested level set
    pub fn normalize_set(levels: &[QuantileLevel]) -> Vec<QuantileLevel> {
        let mut set = levels.to_vec();
        set.sort();
        set.dedup();
        set
    }
}

impl PartialEq for QuantileLevel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QuantileLevel {}

impl PartialOrd for QuantileLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QuantileLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for QuantileLevel {
    /// Shortest round-trip decimal; levels below `1e-4` switch to exponent
    /// form with a two-digit exponent (`1e-05`, `2.5e-07`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1e-4 {
            return write!(f, "{}", self.0);
        }
        let scientific = format!("{:e}", self.0);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) => match exponent.parse::<i32>() {
                Ok(exp) => write!(
                    f,
                    "{}e{}{:02}",
                    mantissa,
                    if exp < 0 { '-' } else { '+' },
                    exp.abs()
                ),
                Err(_) => f.write_str(&scientific),
            },
            None => f.write_str(&scientific),
        }
    }
}

impl FromStr for QuantileLevel {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let level = s.trim().parse::<f64>().map_err(|_| {
            ForecastError::ValidationError(format!("'{}' is not a quantile level", s))
        })?;
        Self::new(level)
    }
}

impl TryFrom<f64> for QuantileLevel {
    type Error = ForecastError;

    fn try_from(level: f64) -> Result<Self> {
        Self::new(level)
    }
}

impl Serialize for QuantileLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Wire form of a level: a JSON number in request lists, a string when it
/// is a map key
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<LevelRepr> for QuantileLevel {
    type Error = ForecastError;

    fn try_from(repr: LevelRepr) -> Result<Self> {
        match repr {
            LevelRepr::Number(level) => Self::new(level),
            LevelRepr::Text(text) => text.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.1, "0.1")]
    #[case(0.5, "0.5")]
    #[case(0.25, "0.25")]
    #[case(0.975, "0.975")]
    #[case(0.0001, "0.0001")]
    #[case(0.00001, "1e-05")]
    #[case(0.000025, "2.5e-05")]
    #[case(3e-12, "3e-12")]
    fn test_display_is_shortest_decimal(#[case] level: f64, #[case] expected: &str) {
        assert_eq!(QuantileLevel::new(level).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(1.5)]
    #[case(f64::INFINITY)]
    fn test_rejects_out_of_range(#[case] level: f64) {
        assert!(matches!(
            QuantileLevel::new(level),
            Err(ForecastError::ValidationError(_))
        ));
    }

    #[test]
    fn test_defaults_render_cleanly() {
        let rendered: Vec<String> = QuantileLevel::defaults()
            .iter()
            .map(|q| q.to_string())
            .collect();
        assert_eq!(
            rendered,
            vec!["0.1", "0.2", "0.3", "0.4", "0.5", "0.6", "0.7", "0.8", "0.9"]
        );
    }

    #[test]
    fn test_normalize_set_sorts_and_dedups() {
        let levels: Vec<QuantileLevel> = [0.9, 0.1, 0.9, 0.5]
            .iter()
            .map(|&q| QuantileLevel::new(q).unwrap())
            .collect();
        let set = QuantileLevel::normalize_set(&levels);
        let values: Vec<f64> = set.iter().map(|q| q.value()).collect();
        assert_eq!(values, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let levels: Vec<QuantileLevel> = serde_json::from_str(r#"[0.1, "0.9"]"#).unwrap();
        assert_eq!(levels[0].value(), 0.1);
        assert_eq!(levels[1].value(), 0.9);

        let bad: std::result::Result<Vec<QuantileLevel>, _> = serde_json::from_str("[2.0]");
        assert!(bad.is_err());
    }

    #[test]
    fn test_tiny_level_key_round_trips() {
        let level = QuantileLevel::new(1e-5).unwrap();
        let parsed: QuantileLevel = level.to_string().parse().unwrap();
        assert_eq!(parsed, level);
    }

    #[test]
    fn test_serializes_as_string() {
        let level = QuantileLevel::new(0.3).unwrap();
        assert_eq!(serde_json::to_string(&level).unwrap(), r#""0.3""#);
    }
}
