//! Application state: single-owner, main-thread only.
//!
//! The TUI holds the click counters and the current `SessionState`; every
//! button press turns into one `Session::step` call whose output replaces
//! the state and, unless the session is over, the chart.

use steplab_core::chart::ChartSpec;
use steplab_core::session::{Clicks, Session, SessionState, StepView, ViewOutput};

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Long,
    Short,
    NextStep,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::Long => "Long",
            Button::Short => "Short",
            Button::NextStep => "Next Step",
        }
    }
}

/// Cumulative press counts, as a button widget would report them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickCounters {
    clicks: Clicks,
}

impl ClickCounters {
    pub fn press(&mut self, button: Button) {
        match button {
            Button::Long => self.clicks.long += 1,
            Button::Short => self.clicks.short += 1,
            Button::NextStep => self.clicks.next_step += 1,
        }
    }

    pub fn snapshot(&self) -> Clicks {
        self.clicks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

pub struct AppState {
    pub running: bool,
    pub overlay: Overlay,
    pub status_message: Option<(String, StatusLevel)>,
    pub theme: Theme,
    session: Session,
    state: SessionState,
    counters: ClickCounters,
    view: StepView,
    chart: ChartSpec,
    next_step_disabled: bool,
}

impl AppState {
    /// Build the app and perform the initial zero-click render.
    pub fn new(session: Session) -> Self {
        let (state, view) = session.start();
        let next_step_disabled = session.is_finished(&state);
        let chart = session.render(&view);
        let mut app = Self {
            running: true,
            overlay: Overlay::None,
            status_message: None,
            theme: Theme::default(),
            session,
            state,
            counters: ClickCounters::default(),
            view,
            chart,
            next_step_disabled,
        };
        app.update_status();
        app
    }

    /// Register a button press and run one transition.
    pub fn press(&mut self, button: Button) {
        if button == Button::NextStep && self.next_step_disabled {
            self.status_message = Some((
                "Step limit reached. Press q to quit.".into(),
                StatusLevel::Warning,
            ));
            return;
        }

        let had_entry = self.state.entry().is_some();
        self.counters.press(button);
        let out = self.session.step(&self.state, self.counters.snapshot());
        self.state = out.state;
        self.next_step_disabled = out.next_step_disabled;
        if let ViewOutput::Updated(view) = out.view {
            self.chart = self.session.render(&view);
            self.view = view;
        }

        if had_entry && button != Button::NextStep {
            self.status_message = Some((
                "A position is already open; only one entry per session.".into(),
                StatusLevel::Info,
            ));
        } else {
            self.update_status();
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Overlay::Help => Overlay::None,
            Overlay::None => Overlay::Help,
        };
    }

    fn update_status(&mut self) {
        self.status_message = if self.view.last_price.is_none() {
            Some((
                format!(
                    "No bar at {}; prices unavailable this step.",
                    self.view.window.end.format("%Y-%m-%d %H:%M")
                ),
                StatusLevel::Warning,
            ))
        } else if let Some(direction) = self.state.pending() {
            Some((
                format!("{direction} armed; fills at the next available price."),
                StatusLevel::Info,
            ))
        } else if self.next_step_disabled {
            Some(("Session complete.".into(), StatusLevel::Info))
        } else {
            None
        };
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn counters(&self) -> ClickCounters {
        self.counters
    }

    pub fn view(&self) -> &StepView {
        &self.view
    }

    pub fn chart(&self) -> &ChartSpec {
        &self.chart
    }

    pub fn next_step_disabled(&self) -> bool {
        self.next_step_disabled
    }
}
