//! Random anchor selection.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::SessionError;
use crate::domain::Series;

/// Pick the instant the first window is centred on.
///
/// The date is uniform across the series span (truncated to its calendar
/// day); the time of day is uniform over the interval's slots. The result may
/// fall where the series has no bar, in which case the window is partial.
pub fn pick_anchor<R: Rng + ?Sized>(
    series: &Series,
    rng: &mut R,
) -> Result<DateTime<Utc>, SessionError> {
    let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) else {
        return Err(SessionError::EmptySeries {
            symbol: series.symbol().to_string(),
        });
    };

    let span_ms = (last - first).num_milliseconds() as f64;
    let offset = Duration::milliseconds((span_ms * rng.gen::<f64>()) as i64);
    let date = (first + offset).date_naive();

    let time = series
        .interval()
        .day_slots()
        .choose(rng)
        .copied()
        .unwrap_or(NaiveTime::MIN);

    Ok(date.and_time(time).and_utc())
}
