//! The step machine: click snapshots in, new state and view out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anchor::pick_anchor;
use super::state::{Clicks, SessionState};
use super::window::{SessionRules, ViewWindow};
use super::SessionError;
use crate::chart::{self, ChartSpec};
use crate::domain::{Direction, Entry, PnL, Series};

/// Immutable context of one session: the series, the anchor, the rules.
///
/// `step` borrows it read-only, so one `Session` can serve any number of
/// independent `SessionState` values.
#[derive(Debug, Clone)]
pub struct Session {
    series: Arc<Series>,
    anchor: DateTime<Utc>,
    initial_start: DateTime<Utc>,
    rules: SessionRules,
}

/// What the view should show after a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub window: ViewWindow,
    pub last_price: Option<f64>,
    pub entry: Option<Entry>,
    pub pnl: Option<PnL>,
}

impl StepView {
    /// Profit/loss line, or an empty string when there is nothing to report.
    pub fn pnl_text(&self) -> String {
        self.pnl.map(|p| p.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewOutput {
    Updated(StepView),
    /// Terminal no-op: keep whatever is on screen.
    Unchanged,
}

impl ViewOutput {
    pub fn view(&self) -> Option<&StepView> {
        match self {
            ViewOutput::Updated(v) => Some(v),
            ViewOutput::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: SessionState,
    pub view: ViewOutput,
    pub next_step_disabled: bool,
}

impl Session {
    /// Start a session on `series` with a randomly chosen anchor.
    pub fn new<R: Rng + ?Sized>(
        series: Arc<Series>,
        rules: SessionRules,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let anchor = pick_anchor(&series, rng)?;
        Ok(Self::with_anchor(series, rules, anchor))
    }

    /// Start a session centred on a known anchor.
    pub fn with_anchor(series: Arc<Series>, rules: SessionRules, anchor: DateTime<Utc>) -> Self {
        let initial_start = anchor
            .checked_sub_signed(rules.window / 2)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        tracing::info!(
            symbol = series.symbol(),
            %anchor,
            %initial_start,
            step_cap = rules.step_cap,
            "session initialized"
        );
        Self {
            series,
            anchor,
            initial_start,
            rules,
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn initial_start(&self) -> DateTime<Utc> {
        self.initial_start
    }

    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    pub fn window_at(&self, step_count: u32) -> ViewWindow {
        ViewWindow::at_step(self.initial_start, step_count, &self.rules)
    }

    /// True once `state` has used every step; further input is ignored.
    pub fn is_finished(&self, state: &SessionState) -> bool {
        state.step_count >= self.rules.step_cap
    }

    /// Initial render: the zero-click transition from a fresh state. Unlike
    /// `step` this always yields a view, whatever the step cap.
    pub fn start(&self) -> (SessionState, StepView) {
        self.transition(&SessionState::new(), Clicks::default())
    }

    /// Apply one click snapshot to `state`.
    pub fn step(&self, state: &SessionState, clicks: Clicks) -> StepOutcome {
        if self.is_finished(state) {
            tracing::debug!(step = state.step_count, "step cap reached; ignoring input");
            return StepOutcome {
                state: state.clone(),
                view: ViewOutput::Unchanged,
                next_step_disabled: true,
            };
        }

        let (next, view) = self.transition(state, clicks);
        let next_step_disabled = self.is_finished(&next);
        StepOutcome {
            state: next,
            view: ViewOutput::Updated(view),
            next_step_disabled,
        }
    }

    fn transition(&self, state: &SessionState, clicks: Clicks) -> (SessionState, StepView) {
        let mut next = state.clone();

        if clicks.next_step > state.seen.next_step {
            next.step_count += 1;
        }

        let window = self.window_at(next.step_count);
        next.last_price = self.series.close_at(window.end);

        if next.entry.is_none() && next.pending.is_none() {
            next.pending = pressed_direction(state.seen, clicks);
        }

        if let (None, Some(direction), Some(price)) = (next.entry, next.pending, next.last_price) {
            tracing::info!(%direction, price, time = %window.end, "position opened");
            next.entry = Some(Entry {
                price,
                time: window.end,
                direction,
            });
            next.pending = None;
        }

        let pnl = match (next.entry, next.last_price) {
            (Some(entry), Some(exit)) if clicks.next_step > 0 => Some(entry.pnl_at(exit)),
            _ => None,
        };

        next.seen = clicks;

        tracing::debug!(
            step = next.step_count,
            window_end = %window.end,
            last_price = ?next.last_price,
            pnl = ?pnl,
            "transition"
        );

        let view = StepView {
            window,
            last_price: next.last_price,
            entry: next.entry,
            pnl,
        };
        (next, view)
    }


    /// Chart for a view produced by this session.
    pub fn render(&self, view: &StepView) -> ChartSpec {
        chart::render(
            &self.series,
            view.window,
            view.entry.map(|e| e.price),
            view.last_price,
        )
    }
}

/// Direction newly pressed since `seen`. Both pressed at once is ambiguous
/// and arms nothing.
fn pressed_direction(seen: Clicks, clicks: Clicks) -> Option<Direction> {
    let long = clicks.long > seen.long;
    let short = clicks.short > seen.short;
    match (long, short) {
        (true, false) => Some(Direction::Long),
        (false, true) => Some(Direction::Short),
        (true, true) => {
            tracing::warn!(
                long = clicks.long,
                short = clicks.short,
                "Long and Short pressed in the same transition; ignoring both"
            );
            None
        }
        (false, false) => None,
    }
}
