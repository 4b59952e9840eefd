//! View window geometry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed rules of a session: how far the window slides and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRules {
    pub step_cap: u32,
    pub window: Duration,
    pub step: Duration,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            step_cap: 5,
            window: Duration::hours(24),
            step: Duration::hours(1),
        }
    }
}

/// Inclusive `[start, end]` slice of the series shown at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ViewWindow {
    /// Window at `step_count` steps past `initial_start`. Timestamps
    /// saturate at the end of the representable range.
    pub fn at_step(initial_start: DateTime<Utc>, step_count: u32, rules: &SessionRules) -> Self {
        let start = i32::try_from(step_count)
            .ok()
            .and_then(|n| rules.step.checked_mul(n))
            .and_then(|offset| initial_start.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            start,
            end: start
                .checked_add_signed(rules.window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn width(&self) -> Duration {
        self.end - self.start
    }
}
