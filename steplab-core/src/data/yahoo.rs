//! Yahoo Finance data provider.
//!
//! Fetches intraday OHLCV bars from Yahoo's v8 chart API. One request per
//! fetch: a failed request maps straight to a `DataError` and is not retried.
//!
//! Yahoo only serves intraday history for a limited look-back (about 60 days
//! for 15-minute bars) and is subject to unannounced format changes. The CSV
//! provider is the offline fallback.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::StatusCode;
use serde::Deserialize;

use super::provider::{DataError, DataProvider, FetchResult};
use super::Interval;
use crate::domain::Bar;

const CHART_API: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        Ok(Self {
            client: Self::build_client(reqwest::blocking::Client::builder())?,
            base_url: CHART_API.to_string(),
        })
    }

    /// Point at a local server, bypassing any system proxy.
    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Result<Self, DataError> {
        Ok(Self {
            client: Self::build_client(reqwest::blocking::Client::builder().no_proxy())?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_client(
        builder: reqwest::blocking::ClientBuilder,
    ) -> Result<reqwest::blocking::Client, DataError> {
        builder
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))
    }

    /// Build the chart API URL. `end` is exclusive, matching the date-range
    /// semantics of the other providers.
    fn chart_url(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        format!(
            "{}/{symbol}?period1={start_ts}&period2={end_ts}&interval={interval}\
             &includePrePost=false",
            self.base_url
        )
    }

    /// Map a non-success HTTP status to the error it stands for.
    fn status_error(status: StatusCode, retry_after: Option<u64>, symbol: &str) -> DataError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => DataError::RateLimited {
                retry_after_secs: retry_after.unwrap_or(60),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DataError::AuthenticationRequired(
                format!("Yahoo Finance refused the request (HTTP {status})"),
            ),
            StatusCode::NOT_FOUND => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            _ => DataError::HttpStatus {
                status: status.as_u16(),
            },
        }
    }

    /// Parse the chart API response into bars.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // Ranges with no trading come back without a timestamp array.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();

            // Intraday gaps arrive as null OHLC; a bar is only usable whole.
            let (Some(open), Some(high), Some(low), Some(close)) = (
                field(&quote.open),
                field(&quote.high),
                field(&quote.low),
                field(&quote.close),
            ) else {
                continue;
            };

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: field(&quote.volume).unwrap_or(0.0),
            });
        }

        Ok(bars)
    }

    /// Issue the chart request once.
    fn request(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, DataError> {
        let url = self.chart_url(symbol, start, end, interval);
        tracing::debug!(%url, "GET");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let err = Self::status_error(status, retry_after, symbol);
            tracing::warn!(symbol, %status, "Yahoo request failed");
            return Err(err);
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, chart)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<FetchResult, DataError> {
        let bars = super::canonicalize(self.request(symbol, start, end, interval)?);
        if bars.is_empty() {
            return Err(DataError::NoBarsInRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        tracing::info!(symbol, bars = bars.len(), %interval, "fetched from Yahoo");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            interval,
            bars,
        })
    }
}
