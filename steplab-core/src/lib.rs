//! StepLab Core: data, indicators, and the step-by-step replay machine.
//!
//! - Bar fetching (Yahoo Finance, CSV, synthetic) with canonicalization
//! - Moving average and Long/Short/Neutral signal columns
//! - Session state machine: anchor, sliding window, one-shot entry, P&L
//! - Frontend-agnostic chart specification

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod rng;
pub mod session;

pub use chart::ChartSpec;
pub use config::SessionConfig;
pub use session::{Clicks, Session, SessionState, StepOutcome, ViewOutput};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: session types can cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Series>();
        require_sync::<domain::Series>();
        require_send::<domain::Entry>();
        require_sync::<domain::Entry>();
        require_send::<session::Session>();
        require_sync::<session::Session>();
        require_send::<session::SessionState>();
        require_sync::<session::SessionState>();
        require_send::<chart::ChartSpec>();
        require_sync::<chart::ChartSpec>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }
}
