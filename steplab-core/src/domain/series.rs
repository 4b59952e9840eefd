//! Series: ordered bars plus aligned moving-average and signal columns.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Bar;
use crate::data::sort_dedup;
use crate::data::Interval;
use crate::indicators::{signals, Indicator, Sma};

/// Directional classification of a bar against its moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Long,
    Short,
    Neutral,
}

/// Bars for one symbol, strictly ascending by timestamp, with derived columns.
///
/// `sma[i]` and `signal[i]` always describe `bars[i]`. MA entries without a
/// full window of history are `None`.
#[derive(Debug, Clone)]
pub struct Series {
    symbol: String,
    interval: Interval,
    bars: Vec<Bar>,
    sma: Vec<Option<f64>>,
    signal: Vec<Signal>,
}

impl Series {
    /// Order `bars` by timestamp (first of each timestamp wins) and compute
    /// the moving average and signal columns. Bars are otherwise kept as the
    /// provider returned them.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
        window_size: usize,
    ) -> Self {
        let bars = sort_dedup(bars);
        let sma = Sma::new(window_size).compute(&bars);
        let signal = signals(&bars, &sma);
        Self {
            symbol: symbol.into(),
            interval,
            bars,
            sma,
            signal,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn sma(&self) -> &[Option<f64>] {
        &self.sma
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signal
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.last().map(|b| b.timestamp)
    }

    /// Index of the bar stamped exactly `ts`.
    pub fn index_of(&self, ts: DateTime<Utc>) -> Option<usize> {
        self.bars.binary_search_by_key(&ts, |b| b.timestamp).ok()
    }

    /// Close of the bar stamped exactly `ts`, if there is one.
    pub fn close_at(&self, ts: DateTime<Utc>) -> Option<f64> {
        self.index_of(ts).map(|i| self.bars[i].close)
    }

    /// Indices of bars with `start <= timestamp <= end`. Empty when the range
    /// lies outside the data or `end < start`.
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Range<usize> {
        let lo = self.bars.partition_point(|b| b.timestamp < start);
        let hi = self.bars.partition_point(|b| b.timestamp <= end);
        lo..hi.max(lo)
    }
}
