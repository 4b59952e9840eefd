//! Indicator engine.
//!
//! Indicators are pure functions: bar history in, one value per bar out.
//! They are computed once when a `Series` is built and never recomputed
//! during a session.

pub mod signal;
pub mod sma;

pub use signal::signals;
pub use sma::Sma;

use crate::domain::Bar;

/// Trait for single-series indicators.
///
/// `compute` returns a vector the same length as `bars`. Entries inside the
/// warmup (`lookback()` bars) are `None`, never a placeholder number.
///
/// No value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces output.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// Create synthetic 15-minute bars from close prices for testing.
///
/// open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::minutes(15 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
