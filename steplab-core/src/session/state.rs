//! SessionState: the value the step machine threads through the UI.

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Entry};

/// Click counters as the UI reports them. Each only ever increases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clicks {
    pub long: u32,
    pub short: u32,
    pub next_step: u32,
}

/// Simulation progress. Only `Session::step` produces new values.
///
/// - `step_count` never decreases and never exceeds the step cap.
/// - `entry` is set at most once and then never changes.
/// - `pending` holds a pressed direction waiting for a price to fill at.
/// - `seen` is the last click snapshot the machine consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) step_count: u32,
    pub(crate) entry: Option<Entry>,
    pub(crate) pending: Option<Direction>,
    pub(crate) last_price: Option<f64>,
    pub(crate) seen: Clicks,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.entry.map(|e| e.price)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.entry.map(|e| e.direction)
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last_price
    }

    pub fn seen(&self) -> Clicks {
        self.seen
    }
}
