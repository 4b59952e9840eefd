//! Parrot/neon theme tokens for the StepLab TUI
//!
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, titles, key hints)
//! - **Positive**: Neon green (up candles, gains, Long)
//! - **Negative**: Hot pink (down candles, losses, Short)
//! - **Warning**: Neon orange (alerts, moving average)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (disabled, axis labels)

use ratatui::style::{Color, Modifier, Style};

use steplab_core::domain::{Direction, Signal};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    /// Moving-average dots
    pub sma: Color,
    /// Dashed entry-price line
    pub entry_line: Color,
    /// Dashed last-price line
    pub last_line: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
            sma: Color::Rgb(255, 140, 0),
            entry_line: Color::Rgb(30, 144, 255),
            last_line: Color::Rgb(50, 205, 50),
        }
    }

    /// Get color for PnL value (positive = green, negative = pink)
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn signal_color(&self, signal: Signal) -> Color {
        match signal {
            Signal::Long => self.positive,
            Signal::Short => self.negative,
            Signal::Neutral => self.neutral,
        }
    }

    pub fn direction_color(&self, direction: Direction) -> Color {
        match direction {
            Direction::Long => self.positive,
            Direction::Short => self.negative,
        }
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Greyed-out button / key hint.
    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.text_secondary)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    }
}
