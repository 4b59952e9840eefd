//! Position direction and the one-shot entry record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the simulated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }

    /// Signed profit of moving from `entry` to `exit` in this direction.
    pub fn profit(self, entry: f64, exit: f64) -> f64 {
        match self {
            Direction::Long => exit - entry,
            Direction::Short => entry - exit,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The filled position: price, time and side are always set together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub price: f64,
    pub time: DateTime<Utc>,
    pub direction: Direction,
}

impl Entry {
    /// Unrealized profit and percentage return at `exit`.
    pub fn pnl_at(&self, exit: f64) -> PnL {
        let profit = self.direction.profit(self.price, exit);
        PnL {
            profit,
            percent: profit / self.price * 100.0,
        }
    }
}

/// Profit/loss of an open entry against an observed close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnL {
    pub profit: f64,
    pub percent: f64,
}

impl fmt::Display for PnL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Profit/Loss: ${:.2} ({:.2}%)", self.profit, self.percent)
    }
}
