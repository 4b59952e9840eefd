//! Test helpers for building sessions over synthetic data

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use steplab_core::data::{Interval, SyntheticProvider};
use steplab_core::domain::Series;
use steplab_core::session::{Session, SessionRules};

/// A week of synthetic 15-minute bars with the anchor mid-week.
pub fn test_session() -> Session {
    test_session_with(SessionRules::default())
}

pub fn test_session_with(rules: SessionRules) -> Session {
    let bars = SyntheticProvider::new(17).generate(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        Interval::M15,
    );
    let series = Series::new("BTC-USD", Interval::M15, bars, 20);
    let anchor = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
    Session::with_anchor(Arc::new(series), rules, anchor)
}
