//! Look-ahead contamination tests.
//!
//! Nothing shown at a step may depend on bars after the window end: the
//! moving average and signal at bar t are computed from bars 0..=t only, and
//! the chart for a window is identical whether or not later bars exist.
//!
//! Method: compute on a truncated series and on the full series and assert
//! the overlapping prefix is identical.

use chrono::{DateTime, Duration, TimeZone, Utc};
use steplab_core::chart::render;
use steplab_core::data::Interval;
use steplab_core::domain::{Bar, Series};
use steplab_core::indicators::{signals, Indicator, Sma};
use steplab_core::session::ViewWindow;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

/// N 15-minute bars of a deterministic pseudo-random walk.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Simple LCG keeps the walk reproducible without an RNG.
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(Bar {
            timestamp: base() + Duration::minutes(15 * i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000.0 + i as f64,
        });
    }
    bars
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let full = indicator.compute(full_bars);
    let truncated = indicator.compute(&full_bars[..truncated_len]);

    assert_eq!(truncated.len(), truncated_len, "{}: length", indicator.name());
    assert_eq!(full.len(), full_bars.len(), "{}: length", indicator.name());

    for i in 0..truncated_len {
        match (truncated[i], full[i]) {
            (None, None) => {}
            (Some(t), Some(f)) => assert!(
                (t - f).abs() < 1e-10,
                "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
                indicator.name()
            ),
            (t, f) => panic!(
                "{}: warmup mismatch at bar {i} (truncated={t:?}, full={f:?})",
                indicator.name()
            ),
        }
    }
}

#[test]
fn lookahead_sma() {
    let bars = make_test_bars(400);
    assert_no_lookahead(&Sma::new(5), &bars, 150);
    assert_no_lookahead(&Sma::new(20), &bars, 150);
    assert_no_lookahead(&Sma::new(50), &bars, 150);
}

#[test]
fn lookahead_signals() {
    let bars = make_test_bars(400);
    let sma = Sma::new(20);
    let full = signals(&bars, &sma.compute(&bars));
    let short = &bars[..150];
    let truncated = signals(short, &sma.compute(short));
    assert_eq!(&full[..150], &truncated[..]);
}

#[test]
fn chart_ignores_bars_after_window_end() {
    let bars = make_test_bars(400);
    let window = ViewWindow {
        start: base() + Duration::hours(30),
        end: base() + Duration::hours(54),
    };
    let cutoff = bars
        .iter()
        .position(|b| b.timestamp > window.end)
        .unwrap();

    let full = Series::new("LA", Interval::M15, bars.clone(), 20);
    let truncated = Series::new("LA", Interval::M15, bars[..cutoff].to_vec(), 20);

    let a = render(&full, window, Some(101.0), Some(102.0));
    let b = render(&truncated, window, Some(101.0), Some(102.0));
    assert_eq!(a, b);
    assert_eq!(a.candles.len(), 24 * 4 + 1);
}
