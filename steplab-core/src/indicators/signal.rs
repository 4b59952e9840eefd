//! Close-versus-moving-average signal.

use crate::domain::{Bar, Signal};

/// Long where close > MA, Short where close < MA, Neutral otherwise
/// (equal, or MA still warming up).
pub fn signals(bars: &[Bar], ma: &[Option<f64>]) -> Vec<Signal> {
    bars.iter()
        .zip(ma.iter().copied().chain(std::iter::repeat(None)))
        .map(|(bar, ma)| match ma {
            Some(m) if bar.close > m => Signal::Long,
            Some(m) if bar.close < m => Signal::Short,
            _ => Signal::Neutral,
        })
        .collect()
}
