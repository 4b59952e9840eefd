//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV
//! import, synthetic walk) so the session can be started offline and mocked
//! in tests.

use chrono::NaiveDate;
use thiserror::Error;

use super::Interval;
use crate::domain::Bar;

/// Structured error types for data operations.
///
/// Every variant means the data is unavailable: a session cannot start
/// without its series, and no fetch is retried.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no bars for '{symbol}' between {start} and {end}")]
    NoBarsInRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("provider returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("csv error: {0}")]
    Csv(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Csv(e.to_string())
    }
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

/// Trait for data providers.
///
/// Implementations return bars sorted ascending by timestamp with no
/// duplicate timestamps.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch bars at `interval` for a symbol over `[start, end)`.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<FetchResult, DataError>;
}
