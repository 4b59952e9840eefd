//! Session configuration (TOML).
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration: one week of 15-minute BTC-USD bars from Yahoo, a 20-bar
//! moving average, a 24-hour window stepping one hour at a time, five steps.

use std::path::{Path, PathBuf};

use chrono::{Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{
    CsvProvider, DataError, DataProvider, Interval, SyntheticProvider, YahooProvider,
};
use crate::session::SessionRules;

/// Upper bound on `weeks` (ten years of history).
pub const MAX_WEEKS: u32 = 520;
/// Upper bound on `step_cap`.
pub const MAX_STEP_CAP: u32 = 10_000;
/// Upper bound on `window_hours` and `step_hours` (one leap year).
pub const MAX_SPAN_HOURS: i64 = 24 * 366;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Yahoo,
    Csv { path: PathBuf },
    Synthetic { seed: u64 },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Yahoo
    }
}

impl SourceConfig {
    /// Build the provider this source describes.
    pub fn provider(&self) -> Result<Box<dyn DataProvider>, DataError> {
        Ok(match self {
            SourceConfig::Yahoo => Box::new(YahooProvider::new()?),
            SourceConfig::Csv { path } => Box::new(CsvProvider::new(path)),
            SourceConfig::Synthetic { seed } => Box::new(SyntheticProvider::new(*seed)),
        })
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub symbol: Option<String>,
    pub weeks: Option<u32>,
    pub end_date: Option<NaiveDate>,
    pub interval: Option<Interval>,
    pub seed: Option<u64>,
    pub source: Option<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub symbol: String,
    /// Weeks of history to fetch, ending at `end_date`.
    pub weeks: u32,
    /// Exclusive end of the fetch range. Defaults to today.
    pub end_date: Option<NaiveDate>,
    pub interval: Interval,
    /// Moving-average window, in bars.
    pub window_size: usize,
    /// Maximum number of Next Step advances.
    pub step_cap: u32,
    pub window_hours: i64,
    pub step_hours: i64,
    /// Replays the same anchor when set.
    pub seed: Option<u64>,
    pub source: SourceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC-USD".to_string(),
            weeks: 1,
            end_date: None,
            interval: Interval::M15,
            window_size: 20,
            step_cap: 5,
            window_hours: 24,
            step_hours: 1,
            seed: None,
            source: SourceConfig::Yahoo,
        }
    }
}

impl SessionConfig {
    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Load `path` if given, otherwise start from the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(symbol) = overrides.symbol {
            self.symbol = symbol;
        }
        if let Some(weeks) = overrides.weeks {
            self.weeks = weeks;
        }
        if let Some(end_date) = overrides.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(interval) = overrides.interval {
            self.interval = interval;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(source) = overrides.source {
            self.source = source;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if !(1..=MAX_WEEKS).contains(&self.weeks) {
            return Err(ConfigError::Invalid(format!(
                "weeks must be between 1 and {MAX_WEEKS}, got {}",
                self.weeks
            )));
        }
        if self.window_size == 0 {
            return Err(ConfigError::Invalid("window_size must be >= 1".into()));
        }
        if !(1..=MAX_STEP_CAP).contains(&self.step_cap) {
            return Err(ConfigError::Invalid(format!(
                "step_cap must be between 1 and {MAX_STEP_CAP}, got {}",
                self.step_cap
            )));
        }
        for (name, hours) in [
            ("window_hours", self.window_hours),
            ("step_hours", self.step_hours),
        ] {
            if !(1..=MAX_SPAN_HOURS).contains(&hours) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 1 and {MAX_SPAN_HOURS}, got {hours}"
                )));
            }
        }
        if let Some(end) = self.end_date {
            if end.checked_sub_days(self.lookback()).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "end_date {end} minus {} weeks is out of range",
                    self.weeks
                )));
            }
        }
        Ok(())
    }

    fn lookback(&self) -> Days {
        Days::new(u64::from(self.weeks) * 7)
    }

    /// `[end - weeks, end)` with `end` defaulting to `today`. The start
    /// saturates at the earliest representable date.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end_date.unwrap_or(today);
        let start = end.checked_sub_days(self.lookback()).unwrap_or(NaiveDate::MIN);
        (start, end)
    }

    pub fn rules(&self) -> SessionRules {
        SessionRules {
            step_cap: self.step_cap,
            window: Duration::hours(self.window_hours),
            step: Duration::hours(self.step_hours),
        }
    }
}
