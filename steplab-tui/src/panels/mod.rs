//! Buffer-drawn widgets.

pub mod candle_chart;

pub use candle_chart::CandleChartPanel;
