//! Timestamp parsing and future timestamp generation

use crate::error::{ForecastError, Result};
use chrono::{Duration, FixedOffset, Months, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Spacing between consecutive forecast points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    #[default]
    Hourly,
    FifteenMinutes,
    ThirtyMinutes,
    Daily,
    Weekly,
    /// Calendar months; the day of month clamps to the month's last day
    Monthly,
}

impl Frequency {
    /// Look up a frequency code, `None` if it is not recognized
    pub fn recognize(code: &str) -> Option<Self> {
        match code {
            "h" => Some(Frequency::Hourly),
            "15min" | "15T" => Some(Frequency::FifteenMinutes),
            "30min" | "30T" => Some(Frequency::ThirtyMinutes),
            "d" | "D" => Some(Frequency::Daily),
            "w" | "W" => Some(Frequency::Weekly),
            "m" | "M" => Some(Frequency::Monthly),
            _ => None,
        }
    }

    /// Resolve a frequency code, treating anything unrecognized as hourly
    pub fn from_code(code: &str) -> Self {
        Self::recognize(code).unwrap_or_else(|| {
            debug!(code, "Unrecognized frequency code, falling back to hourly");
            Frequency::Hourly
        })
    }

    /// Canonical code of this frequency
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Hourly => "h",
            Frequency::FifteenMinutes => "15min",
            Frequency::ThirtyMinutes => "30min",
            Frequency::Daily => "d",
            Frequency::Weekly => "w",
            Frequency::Monthly => "m",
        }
    }

    /// Length of one step in minutes, `None` for calendar months
    fn step_minutes(&self) -> Option<i64> {
        match self {
            Frequency::Hourly => Some(60),
            Frequency::FifteenMinutes => Some(15),
            Frequency::ThirtyMinutes => Some(30),
            Frequency::Daily => Some(24 * 60),
            Frequency::Weekly => Some(7 * 24 * 60),
            Frequency::Monthly => None,
        }
    }

    /// The point `steps` steps after `start`
    pub fn advance(&self, start: NaiveDateTime, steps: usize) -> Result<NaiveDateTime> {
        let overflow = || {
            ForecastError::ComputationError(format!(
                "Advancing {} by {} steps of '{}' leaves the supported date range",
                start,
                steps,
                self.code()
            ))
        };

        match self.step_minutes() {
            Some(minutes) => {
                let total = i64::try_from(steps)
                    .ok()
                    .and_then(|n| n.checked_mul(minutes))
                    .ok_or_else(overflow)?;
                let delta = Duration::try_minutes(total).ok_or_else(overflow)?;
                start.checked_add_signed(delta).ok_or_else(overflow)
            }
            None => {
                let months = u32::try_from(steps).map_err(|_| overflow())?;
                start
                    .checked_add_months(Months::new(months))
                    .ok_or_else(overflow)
            }
        }
    }
}

impl From<&str> for Frequency {
    fn from(code: &str) -> Self {
        Frequency::from_code(code)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A wall-clock date-time with the UTC offset it was written with, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    pub fn naive(local: NaiveDateTime) -> Self {
        Self {
            local,
            offset: None,
        }
    }

    pub fn with_offset(local: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            local,
            offset: Some(offset),
        }
    }

    /// Wall-clock part
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Parse a timestamp written in any of the accepted formats
    pub fn parse(input: &str) -> Result<Self> {
        date_parser::parse(input)
    }
}

impl FromStr for Timestamp {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    /// ISO-8601, with microseconds only when present and the offset only when
    /// one was parsed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.local.nanosecond() == 0 {
            write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S"))?;
        } else {
            write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S%.6f"))?;
        }

        if let Some(offset) = self.offset {
            let seconds = offset.local_minus_utc();
            let sign = if seconds < 0 { '-' } else { '+' };
            let seconds = seconds.abs();
            write!(f, "{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60)?;
        }
        Ok(())
    }
}

/// The `horizon` timestamps following `last`, one frequency step apart
///
/// Each point is computed from `last` directly (`last + i * step`), so monthly
/// steps never accumulate day-of-month clamping.
pub fn generate(last: &Timestamp, horizon: usize, freq: Frequency) -> Result<Vec<Timestamp>> {
    (1..=horizon)
        .map(|i| {
            let local = freq.advance(last.local, i)?;
            Ok(Timestamp {
                local,
                offset: last.offset,
            })
        })
        .collect()
}

/// Create future timestamps for forecasting from a raw timestamp and code
pub fn future_timestamps(last_timestamp: &str, horizon: usize, frequency: &str) -> Result<Vec<String>> {
    let last = Timestamp::parse(last_timestamp)?;
    let timestamps = generate(&last, horizon, Frequency::from_code(frequency))?;
    Ok(timestamps.iter().map(Timestamp::to_string).collect())
}

/// Lenient parsing of human- and machine-written date-times
pub mod date_parser {
    use super::Timestamp;
    use crate::error::{ForecastError, Result};
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

    const OFFSET_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
    ];

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S%.f",
        "%m/%d/%Y %H:%M",
        "%Y%m%dT%H%M%S",
        "%d %b %Y %H:%M:%S",
        "%b %d, %Y %H:%M:%S",
    ];

    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%Y%m%d",
        "%d %b %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%b %d %Y",
    ];

    /// Parse a date-time, keeping any explicit UTC offset
    pub fn parse(input: &str) -> Result<Timestamp> {
        let trimmed = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(from_fixed(dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
            return Ok(from_fixed(dt));
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
                return Ok(from_fixed(dt));
            }
        }

        // Zulu suffix on a layout without seconds or with a space separator
        if let Some(rest) = trimmed.strip_suffix(['Z', 'z']) {
            if let Some(local) = parse_naive(rest) {
                return Ok(Timestamp::with_offset(local, utc_offset()?));
            }
        }

        parse_naive(trimmed).map(Timestamp::naive).ok_or_else(|| {
            ForecastError::ParseError(format!("Unable to parse timestamp '{}'", input))
        })
    }

    fn parse_naive(input: &str) -> Option<NaiveDateTime> {
        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
    }

    fn from_fixed(dt: DateTime<FixedOffset>) -> Timestamp {
        Timestamp::with_offset(dt.naive_local(), *dt.offset())
    }

    fn utc_offset() -> Result<FixedOffset> {
        FixedOffset::east_opt(0)
            .ok_or_else(|| ForecastError::ComputationError("Invalid UTC offset".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_hourly_steps() {
        let out = future_timestamps("2024-01-01T00:00:00", 3, "h").unwrap();
        assert_eq!(
            out,
            vec![
                "2024-01-01T01:00:00",
                "2024-01-01T02:00:00",
                "2024-01-01T03:00:00"
            ]
        );
    }

    #[rstest]
    #[case("15min", "2024-01-01T00:15:00")]
    #[case("15T", "2024-01-01T00:15:00")]
    #[case("30min", "2024-01-01T00:30:00")]
    #[case("30T", "2024-01-01T00:30:00")]
    #[case("d", "2024-01-02T00:00:00")]
    #[case("D", "2024-01-02T00:00:00")]
    #[case("w", "2024-01-08T00:00:00")]
    #[case("W", "2024-01-08T00:00:00")]
    #[case("M", "2024-02-01T00:00:00")]
    fn test_first_step_per_frequency(#[case] code: &str, #[case] expected: &str) {
        let out = future_timestamps("2024-01-01T00:00:00", 1, code).unwrap();
        assert_eq!(out, vec![expected]);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let out = future_timestamps("2024-01-31T00:00:00", 1, "m").unwrap();
        assert_eq!(out, vec!["2024-02-29T00:00:00"]);

        let out = future_timestamps("2023-01-31T12:30:00", 1, "m").unwrap();
        assert_eq!(out, vec!["2023-02-28T12:30:00"]);
    }

    #[test]
    fn test_monthly_steps_are_computed_from_the_start() {
        let out = future_timestamps("2024-01-31T00:00:00", 3, "m").unwrap();
        assert_eq!(
            out,
            vec![
                "2024-02-29T00:00:00",
                "2024-03-31T00:00:00",
                "2024-04-30T00:00:00"
            ]
        );
    }

    #[rstest]
    #[case("bogus")]
    #[case("")]
    #[case("H")]
    #[case("1h")]
    fn test_unknown_frequency_falls_back_to_hourly(#[case] code: &str) {
        assert_eq!(Frequency::from_code(code), Frequency::Hourly);
        assert_eq!(
            future_timestamps("2024-03-10T22:00:00", 4, code).unwrap(),
            future_timestamps("2024-03-10T22:00:00", 4, "h").unwrap()
        );
    }

    #[test]
    fn test_output_is_strictly_increasing_and_after_last() {
        let last = Timestamp::parse("2024-12-31T23:45:00").unwrap();
        for freq in [
            Frequency::Hourly,
            Frequency::FifteenMinutes,
            Frequency::ThirtyMinutes,
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
        ] {
            let out = generate(&last, 12, freq).unwrap();
            assert_eq!(out.len(), 12);
            assert!(out[0].local() > last.local());
            assert!(out.windows(2).all(|w| w[0].local() < w[1].local()));
        }
    }

    #[test]
    fn test_zero_horizon_yields_nothing() {
        let last = Timestamp::parse("2024-01-01").unwrap();
        assert!(generate(&last, 0, Frequency::Daily).unwrap().is_empty());
    }

    #[test]
    fn test_offset_is_preserved() {
        let out = future_timestamps("2024-01-01T00:00:00Z", 1, "h").unwrap();
        assert_eq!(out, vec!["2024-01-01T01:00:00+00:00"]);

        let out = future_timestamps("2024-01-01T23:30:00-05:30", 1, "30min").unwrap();
        assert_eq!(out, vec!["2024-01-02T00:00:00-05:30"]);
    }

    #[test]
    fn test_fractional_seconds_are_kept() {
        let out = future_timestamps("2024-01-01 00:00:00.250", 1, "d").unwrap();
        assert_eq!(out, vec!["2024-01-02T00:00:00.250000"]);
    }

    #[rstest]
    #[case("2024-01-15", "2024-01-15T00:00:00")]
    #[case("2024-01-15T14:30:45", "2024-01-15T14:30:45")]
    #[case("2024-01-15 14:30", "2024-01-15T14:30:00")]
    #[case("2024/01/15", "2024-01-15T00:00:00")]
    #[case("01/15/2024", "2024-01-15T00:00:00")]
    #[case("01/15/2024 08:05:00", "2024-01-15T08:05:00")]
    #[case("20240115", "2024-01-15T00:00:00")]
    #[case("20240115T143045", "2024-01-15T14:30:45")]
    #[case("15 Jan 2024", "2024-01-15T00:00:00")]
    #[case("Jan 15, 2024", "2024-01-15T00:00:00")]
    #[case("January 15, 2024", "2024-01-15T00:00:00")]
    #[case("  2024-01-15T14:30:45  ", "2024-01-15T14:30:45")]
    #[case("2024-01-15T14:30:45+02:00", "2024-01-15T14:30:45+02:00")]
    #[case("2024-01-15 14:30:45Z", "2024-01-15T14:30:45+00:00")]
    #[case("Mon, 15 Jan 2024 14:30:45 +0000", "2024-01-15T14:30:45+00:00")]
    fn test_date_parser_formats(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Timestamp::parse(input).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("")]
    #[case("2024-13-45")]
    #[case("yesterday")]
    fn test_date_parser_rejects_garbage(#[case] input: &str) {
        assert!(matches!(
            Timestamp::parse(input),
            Err(ForecastError::ParseError(_))
        ));
    }

    #[test]
    fn test_calendar_overflow_is_a_computation_error() {
        let last = Timestamp::parse("2024-01-01").unwrap().local();
        assert!(matches!(
            Frequency::Weekly.advance(last, usize::MAX),
            Err(ForecastError::ComputationError(_))
        ));
        assert!(matches!(
            Frequency::Monthly.advance(last, u32::MAX as usize),
            Err(ForecastError::ComputationError(_))
        ));
    }
}
