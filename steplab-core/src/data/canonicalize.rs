//! Canonicalize provider output: sort, dedupe, drop insane bars.

use crate::domain::Bar;

/// Sort ascending by timestamp and keep the first bar of each timestamp.
pub fn sort_dedup(mut bars: Vec<Bar>) -> Vec<Bar> {
    // Stable sort keeps provider order within a timestamp, so dedup keeps the first.
    bars.sort_by_key(|b| b.timestamp);
    let before = bars.len();
    bars.dedup_by_key(|b| b.timestamp);
    let duplicates = before - bars.len();
    if duplicates > 0 {
        tracing::debug!(duplicates, kept = bars.len(), "dropped duplicate timestamps");
    }
    bars
}

/// Drop bars that fail `Bar::is_sane`, then `sort_dedup`.
///
/// Rejected bars leave gaps a session later reports as missing, so they are
/// logged at warn.
pub fn canonicalize(bars: Vec<Bar>) -> Vec<Bar> {
    let total = bars.len();
    let sane: Vec<Bar> = bars.into_iter().filter(Bar::is_sane).collect();
    let rejected = total - sane.len();
    if rejected > 0 {
        tracing::warn!(rejected, kept = sane.len(), "dropped malformed bars");
    }
    sort_dedup(sane)
}
