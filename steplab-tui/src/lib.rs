//! StepLab TUI: Long / Short / Next Step replay over a candle chart
//!
//! - Button bar with step counter
//! - Candle chart with moving average and entry / last-price lines
//! - Profit/loss line and status bar
//! - Help overlay

pub mod app;
pub mod input;
pub mod panels;
pub mod theme;
pub mod ui;

pub use app::{AppState, Button, ClickCounters};
pub use input::handle_key;
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
