//! Candle chart panel - draws a `ChartSpec` into the terminal buffer
//!
//! Renders candlestick chart using direct buffer writes:
//! - Each candle = 1 terminal column
//! - Body: block char, green if close >= open, pink otherwise
//! - Wicks: vertical line chars to high/low
//! - Moving average: one dot per column
//! - Reference lines: horizontal dashed lines at entry / last price

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use steplab_core::chart::{ChartSpec, ReferenceKind};

use crate::theme::Theme;

const TIME_FORMAT: &str = "%m-%d %H:%M";

pub struct CandleChartPanel<'a> {
    chart: &'a ChartSpec,
    theme: &'a Theme,
}

impl<'a> CandleChartPanel<'a> {
    pub fn new(chart: &'a ChartSpec, theme: &'a Theme) -> Self {
        Self { chart, theme }
    }

    /// Map a price to a Y position in the plot area (0 = top)
    fn price_to_y(&self, price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
        if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
            return 0;
        }
        let frac = (price - y_min) / (y_max - y_min);
        let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round().max(0.0).min(plot_height.saturating_sub(1) as f64) as u16
    }
}

impl<'a> Widget for CandleChartPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let candles = &self.chart.candles;
        let Some((y_min, y_max)) = self.chart.price_bounds().filter(|_| !candles.is_empty())
        else {
            let block = Block::default()
                .title(format!(" {} [No Data] ", self.chart.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        };

        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let up_count = candles.iter().filter(|c| c.is_up()).count();
        let down_count = candles.len() - up_count;

        let title = format!(
            " {} | {} bars | {} up {} down ",
            self.chart.title,
            candles.len(),
            up_count,
            down_count,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for Y-axis labels, bottom row for the X axis.
        let label_width: u16 = 10;
        let plot_left = inner.x + label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(label_width);
        let plot_height = inner.height.saturating_sub(1);

        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (label_val, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            let label = format!("{:>9.2}", label_val);
            buf.set_string(
                inner.x,
                plot_top + y_pos,
                &label,
                Style::default().fg(self.theme.muted),
            );
        }

        // Most recent candles win when the window is wider than the plot.
        let bars_to_draw = candles.len().min(plot_width as usize);
        let start_bar = candles.len() - bars_to_draw;
        let visible = &candles[start_bar..];

        let sma_style = Style::default().fg(self.theme.sma);
        for (i, candle) in visible.iter().enumerate() {
            let ts = candle.timestamp;
            if let Ok(idx) = self.chart.sma.binary_search_by_key(&ts, |(t, _)| *t) {
                let y = self.price_to_y(self.chart.sma[idx].1, y_lower, y_upper, plot_height);
                buf.set_string(plot_left + i as u16, plot_top + y, "\u{2022}", sma_style);
            }
        }

        for (i, candle) in visible.iter().enumerate() {
            let x = plot_left + i as u16;
            let is_up = candle.is_up();
            let color = if is_up {
                self.theme.positive
            } else {
                self.theme.negative
            };
            let style = Style::default().fg(color);

            let high_y = self.price_to_y(candle.high, y_lower, y_upper, plot_height);
            let low_y = self.price_to_y(candle.low, y_lower, y_upper, plot_height);
            let body_top_y =
                self.price_to_y(candle.open.max(candle.close), y_lower, y_upper, plot_height);
            let body_bot_y =
                self.price_to_y(candle.open.min(candle.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "\u{2502}", style);
            }

            let body_char = if is_up { "\u{2588}" } else { "\u{2593}" };
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body_char, style);
            }

            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "\u{2502}", style);
            }
        }

        let mut labelled_rows: Vec<u16> = Vec::new();
        for line in &self.chart.reference_lines {
            let y = self.price_to_y(line.price, y_lower, y_upper, plot_height);
            let py = plot_top + y;

            let color = match line.kind {
                ReferenceKind::Entry => self.theme.entry_line,
                ReferenceKind::Last => self.theme.last_line,
            };
            let style = Style::default().fg(color).add_modifier(Modifier::DIM);

            for x in plot_left..plot_left + plot_width {
                if (x - plot_left) % 3 == 0 {
                    buf.set_string(x, py, "-", style);
                }
            }

            // Right-aligned, or left-aligned when another label already sits on this row.
            let label = format!("{} {:.2}", line.label, line.price);
            let label_x = if labelled_rows.contains(&py) {
                plot_left
            } else {
                (plot_left + plot_width)
                    .saturating_sub(label.len() as u16)
                    .max(plot_left)
            };
            labelled_rows.push(py);
            let label_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            buf.set_stringn(label_x, py, &label, plot_width as usize, label_style);
        }

        // X axis: first and last visible timestamps.
        let axis_y = plot_top + plot_height;
        let axis_style = Style::default().fg(self.theme.muted);
        if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
            let left = first.timestamp.format(TIME_FORMAT).to_string();
            let right = last.timestamp.format(TIME_FORMAT).to_string();
            buf.set_stringn(plot_left, axis_y, &left, plot_width as usize, axis_style);
            let right_x = (plot_left + plot_width).saturating_sub(right.len() as u16);
            if right_x > plot_left + left.len() as u16 {
                buf.set_string(right_x, axis_y, &right, axis_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use steplab_core::chart::{Candle, ReferenceLine};
    use steplab_core::domain::Signal;
    use steplab_core::session::ViewWindow;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn make_chart(ohlc: &[(f64, f64, f64, f64)], refs: Vec<ReferenceLine>) -> ChartSpec {
        let candles: Vec<Candle> = ohlc
            .iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Candle {
                timestamp: t0() + Duration::minutes(15 * i as i64),
                open,
                high,
                low,
                close,
                signal: Signal::Neutral,
            })
            .collect();
        let end = candles.last().map(|c| c.timestamp).unwrap_or_else(t0);
        let sma = candles.iter().skip(1).map(|c| (c.timestamp, c.close)).collect();
        ChartSpec {
            title: "SPY: Price and Trading Signals".into(),
            window: ViewWindow { start: t0(), end },
            candles,
            sma,
            reference_lines: refs,
        }
    }

    fn test_candles() -> Vec<(f64, f64, f64, f64)> {
        vec![
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 100.5),
            (100.5, 104.0, 99.5, 103.0),
            (103.0, 105.0, 101.0, 102.0),
            (102.0, 106.0, 101.5, 105.5),
        ]
    }

    fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            content.push('\n');
        }
        content
    }

    #[test]
    fn test_candle_chart_renders_without_panic() {
        let theme = Theme::default();
        let chart = make_chart(&test_candles(), vec![]);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&chart, &theme).render(area, &mut buf);
        let text = buffer_text(&buf, area);
        assert!(text.contains("5 bars | 3 up 2 down"));
    }

    #[test]
    fn test_reference_lines_are_labelled() {
        let theme = Theme::default();
        let refs = vec![
            ReferenceLine {
                price: 100.5,
                label: "Entry Price".into(),
                kind: ReferenceKind::Entry,
            },
            ReferenceLine {
                price: 105.5,
                label: "Last Price".into(),
                kind: ReferenceKind::Last,
            },
        ];
        let chart = make_chart(&test_candles(), refs);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&chart, &theme).render(area, &mut buf);

        let text = buffer_text(&buf, area);
        assert!(text.contains("Entry Price 100.50"));
        assert!(text.contains("Last Price 105.50"));
    }

    #[test]
    fn test_x_axis_shows_first_and_last_time() {
        let theme = Theme::default();
        let chart = make_chart(&test_candles(), vec![]);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&chart, &theme).render(area, &mut buf);

        let text = buffer_text(&buf, area);
        assert!(text.contains("03-04 09:00"));
        assert!(text.contains("03-04 10:00"));
    }

    #[test]
    fn test_candle_chart_empty() {
        let theme = Theme::default();
        let chart = make_chart(&[], vec![]);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&chart, &theme).render(area, &mut buf);
        assert!(buffer_text(&buf, area).contains("No Data"));
    }

    proptest::proptest! {
        #[test]
        fn test_any_area_renders_without_panic(w in 0u16..120, h in 0u16..40, entry in 90.0..110.0_f64) {
            let theme = Theme::default();
            let refs = vec![ReferenceLine {
                price: entry,
                label: "Entry Price".into(),
                kind: ReferenceKind::Entry,
            }];
            let chart = make_chart(&test_candles(), refs);
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            CandleChartPanel::new(&chart, &theme).render(area, &mut buf);
        }
    }
}
