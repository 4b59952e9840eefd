//! Synthetic provider: a seeded random walk at the requested interval.
//!
//! Used for offline sessions and for tests that need a dense, gap-free series.

use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataProvider, FetchResult};
use super::Interval;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    /// Maximum absolute per-bar return.
    step_volatility: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_price: 100.0,
            step_volatility: 0.004,
        }
    }

    /// Generate bars covering `[start, end)` with no gaps.
    pub fn generate(&self, start: NaiveDate, end: NaiveDate, interval: Interval) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let first = start.and_time(NaiveTime::MIN).and_utc();
        let stop = end.and_time(NaiveTime::MIN).and_utc();
        let step = interval.duration();

        let mut bars = Vec::new();
        let mut close = self.start_price;
        let mut ts = first;
        while ts < stop {
            let open = close;
            let ret = rng.gen_range(-self.step_volatility..=self.step_volatility);
            close = (open * (1.0 + ret)).max(0.01);
            let wick = self.step_volatility * 0.5;
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..=wick));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..=wick));
            bars.push(Bar {
                timestamp: ts,
                open,
                high,
                low,
                close,
                volume: rng.gen_range(10.0..1_000.0_f64).round(),
            });
            ts += step;
        }
        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<FetchResult, DataError> {
        let bars = self.generate(start, end, interval);
        if bars.is_empty() {
            return Err(DataError::NoBarsInRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        tracing::info!(symbol, bars = bars.len(), seed = self.seed, "generated synthetic bars");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            interval,
            bars,
        })
    }
}
