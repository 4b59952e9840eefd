//! Bar interval: the fixed time granularity of a series.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Supported intraday bar lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    M1,
    M5,
    M15,
    M30,
    H1,
}

impl Interval {
    pub fn minutes(self) -> i64 {
        match self {
            Interval::M1 => 1,
            Interval::M5 => 5,
            Interval::M15 => 15,
            Interval::M30 => 30,
            Interval::H1 => 60,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(self.minutes())
    }

    /// Provider query code ("15m", "60m", ...).
    pub fn code(self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "60m",
        }
    }

    /// Every bar start time within one day: 00:00, 00:15, ..., 23:45 for 15m.
    pub fn day_slots(self) -> Vec<NaiveTime> {
        let step = self.duration();
        (0..(24 * 60) / self.minutes())
            .map(|i| NaiveTime::MIN + step * i as i32)
            .collect()
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::M15
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported interval '{0}' (expected 1m, 5m, 15m, 30m, 60m or 1h)")]
pub struct ParseIntervalError(pub String);

impl FromStr for Interval {
    type Err = ParseIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Interval::M1),
            "5m" => Ok(Interval::M5),
            "15m" => Ok(Interval::M15),
            "30m" => Ok(Interval::M30),
            "60m" | "1h" => Ok(Interval::H1),
            other => Err(ParseIntervalError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = ParseIntervalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.code().to_string()
    }
}
