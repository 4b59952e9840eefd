//! Chart specification for one view window.
//!
//! `render` is frontend-agnostic: the TUI draws a `ChartSpec` into a
//! terminal buffer, the CLI serializes it as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Series, Signal};
use crate::session::ViewWindow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub signal: Signal,
}

impl Candle {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Entry,
    Last,
}

/// Horizontal dashed line across the whole chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub price: f64,
    pub label: String,
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub window: ViewWindow,
    pub candles: Vec<Candle>,
    pub sma: Vec<(DateTime<Utc>, f64)>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Lowest and highest price the chart must show, reference lines included.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let lows = self.candles.iter().map(|c| c.low);
        let highs = self.candles.iter().map(|c| c.high);
        let refs = self.reference_lines.iter().map(|r| r.price);
        let smas = self.sma.iter().map(|(_, v)| *v);

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in lows.chain(highs).chain(refs).chain(smas) {
            min = min.min(v);
            max = max.max(v);
        }
        (min.is_finite() && max.is_finite()).then_some((min, max))
    }
}

/// Build the chart for `window`: candles, the moving average, and the entry
/// and last-price lines when known.
pub fn render(
    series: &Series,
    window: ViewWindow,
    entry_price: Option<f64>,
    last_price: Option<f64>,
) -> ChartSpec {
    let range = series.range(window.start, window.end);
    let bars = &series.bars()[range.clone()];
    let sma = &series.sma()[range.clone()];
    let signals = &series.signals()[range];

    let candles = bars
        .iter()
        .zip(signals)
        .map(|(b, &signal)| Candle {
            timestamp: b.timestamp,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            signal,
        })
        .collect();

    let sma = bars
        .iter()
        .zip(sma)
        .filter_map(|(b, v)| v.map(|v| (b.timestamp, v)))
        .collect();

    let mut reference_lines = Vec::with_capacity(2);
    if let Some(price) = entry_price {
        reference_lines.push(ReferenceLine {
            price,
            label: "Entry Price".into(),
            kind: ReferenceKind::Entry,
        });
    }
    if let Some(price) = last_price {
        reference_lines.push(ReferenceLine {
            price,
            label: "Last Price".into(),
            kind: ReferenceKind::Last,
        });
    }

    ChartSpec {
        title: format!("{}: Price and Trading Signals", series.symbol()),
        window,
        candles,
        sma,
        reference_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Interval;
    use crate::indicators::make_bars;
    use chrono::{Duration, TimeZone};

    fn series(n: usize) -> Series {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        Series::new("BTC-USD", Interval::M15, make_bars(&closes), 4)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn slice_includes_both_ends() {
        let s = series(20);
        let window = ViewWindow {
            start: t0() + Duration::minutes(30),
            end: t0() + Duration::minutes(90),
        };
        let chart = render(&s, window, None, None);
        assert_eq!(chart.candles.len(), 5);
        assert_eq!(chart.candles[0].timestamp, window.start);
        assert_eq!(chart.candles[4].timestamp, window.end);
        assert_eq!(chart.title, "BTC-USD: Price and Trading Signals");
    }

    #[test]
    fn sma_skips_warmup() {
        let s = series(10);
        let window = ViewWindow {
            start: t0(),
            end: t0() + Duration::hours(3),
        };
        let chart = render(&s, window, None, None);
        assert_eq!(chart.candles.len(), 10);
        assert_eq!(chart.sma.len(), 7);
        assert_eq!(chart.sma[0].0, t0() + Duration::minutes(45));
    }

    #[test]
    fn window_outside_series_is_empty_but_valid() {
        let s = series(10);
        let window = ViewWindow {
            start: t0() + Duration::days(5),
            end: t0() + Duration::days(6),
        };
        let chart = render(&s, window, Some(100.0), None);
        assert!(chart.is_empty());
        assert!(chart.sma.is_empty());
        assert_eq!(chart.reference_lines.len(), 1);
    }

    #[test]
    fn reference_lines_track_prices() {
        let s = series(10);
        let window = ViewWindow {
            start: t0(),
            end: t0() + Duration::hours(1),
        };
        assert!(render(&s, window, None, None).reference_lines.is_empty());

        let chart = render(&s, window, Some(101.0), Some(104.0));
        let kinds: Vec<_> = chart.reference_lines.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReferenceKind::Entry, ReferenceKind::Last]);
        assert_eq!(chart.reference_lines[0].label, "Entry Price");
        assert_eq!(chart.reference_lines[1].price, 104.0);
    }

    #[test]
    fn bounds_cover_reference_lines() {
        let s = series(5);
        let window = ViewWindow {
            start: t0(),
            end: t0() + Duration::hours(1),
        };
        let chart = render(&s, window, Some(50.0), None);
        let (lo, hi) = chart.price_bounds().unwrap();
        assert_eq!(lo, 50.0);
        assert_eq!(hi, 105.0);
    }
}
