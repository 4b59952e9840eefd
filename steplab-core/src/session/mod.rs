//! Session state machine.
//!
//! A `Session` is the fixed context (series, anchor, rules); a
//! `SessionState` is the evolving value. `Session::step` maps
//! `(state, clicks)` to `(state', view)` without touching anything else, so
//! a UI owns its state explicitly and tests can replay any click sequence.

pub mod anchor;
pub mod machine;
pub mod state;
pub mod window;

pub use anchor::pick_anchor;
pub use machine::{Session, StepOutcome, StepView, ViewOutput};
pub use state::{Clicks, SessionState};
pub use window::{SessionRules, ViewWindow};

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::data::{DataError, DataProvider};
use crate::domain::Series;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no bars for '{symbol}'; cannot pick a starting point")]
    EmptySeries { symbol: String },

    #[error("data unavailable: {0}")]
    Data(#[from] DataError),
}

/// Fetch the configured range once and build the indicator-bearing series.
pub fn load_series(
    provider: &dyn DataProvider,
    config: &SessionConfig,
    today: NaiveDate,
) -> Result<Series, SessionError> {
    let (start, end) = config.date_range(today);
    tracing::info!(
        provider = provider.name(),
        symbol = %config.symbol,
        %start,
        %end,
        interval = %config.interval,
        "fetching bars"
    );
    let fetched = provider.fetch(&config.symbol, start, end, config.interval)?;
    Ok(Series::new(
        fetched.symbol,
        fetched.interval,
        fetched.bars,
        config.window_size,
    ))
}
