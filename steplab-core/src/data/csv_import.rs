//! CSV import/export.
//!
//! Format: header `time,open,high,low,close[,volume]`. `time` may be RFC 3339,
//! `YYYY-MM-DD HH:MM[:SS]` (read as UTC), or unix seconds.

use std::io::{Read, Write};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::{DataError, DataProvider, FetchResult};
use super::Interval;
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "timestamp", alias = "datetime", alias = "date")]
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Parse a timestamp in any of the accepted formats.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DataError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(secs) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt);
        }
    }
    Err(DataError::Csv(format!("unrecognized timestamp '{s}'")))
}

/// Read every bar from CSV input, in file order.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut bars = Vec::new();
    for record in rdr.deserialize::<CsvRecord>() {
        let record = record?;
        bars.push(Bar {
            timestamp: parse_timestamp(&record.time)?,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume.unwrap_or(0.0),
        });
    }
    Ok(bars)
}

/// Write bars as CSV with RFC 3339 timestamps.
pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in bars {
        wtr.serialize(CsvRow {
            time: bar.timestamp.to_rfc3339(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Provider backed by a local CSV file.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<FetchResult, DataError> {
        let file = std::fs::File::open(&self.path)?;
        let bars: Vec<Bar> = read_bars(file)?
            .into_iter()
            .filter(|b| {
                let day = b.timestamp.date_naive();
                day >= start && day < end
            })
            .collect();
        let bars = super::canonicalize(bars);
        if bars.is_empty() {
            return Err(DataError::NoBarsInRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        tracing::info!(symbol, bars = bars.len(), path = %self.path.display(), "loaded CSV");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            interval,
            bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use chrono::TimeZone;

    #[test]
    fn parses_supported_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T09:15:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T10:15:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01 09:15:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01 09:15").unwrap(), expected);
        assert_eq!(parse_timestamp("1709284500").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn write_then_read_preserves_bars() {
        let bars = make_bars(&[10.0, 11.0, 12.5]);
        let mut buf = Vec::new();
        write_bars(&mut buf, &bars).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("time,open,high,low,close,volume"));
        assert_eq!(read_bars(buf.as_slice()).unwrap(), bars);
    }

    #[test]
    fn volume_column_is_optional() {
        let input = "time,open,high,low,close\n2024-03-01 00:00,1,2,0.5,1.5\n";
        let bars = read_bars(input.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[test]
    fn provider_filters_to_date_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        let input = "time,open,high,low,close,volume\n\
            2024-03-01 23:45,1,2,0.5,1.5,1\n\
            2024-03-02 00:00,1,2,0.5,1.6,1\n\
            2024-03-03 00:00,1,2,0.5,1.7,1\n";
        std::fs::write(&path, input).unwrap();

        let provider = CsvProvider::new(&path);
        let result = provider
            .fetch(
                "TEST",
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                Interval::M15,
            )
            .unwrap();
        assert_eq!(result.bars.len(), 1);
        assert_eq!(result.bars[0].close, 1.6);
    }

    #[test]
    fn provider_reports_empty_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        std::fs::write(&path, "time,open,high,low,close\n2024-03-01 00:00,1,2,0.5,1.5\n").unwrap();
        let err = CsvProvider::new(&path)
            .fetch(
                "TEST",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                Interval::M15,
            )
            .unwrap_err();
        assert!(matches!(err, DataError::NoBarsInRange { .. }));
    }
}
