//! Beats-per-minute from crossing spacing.
//!
//! The rate is derived from the mean interval across *all* crossings in the
//! window: `(t_last - t_first) / (n - 1)`. No physiological clamping.

use crate::data::samples::Sample;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Mean spacing between consecutive crossings in milliseconds.
///
/// `None` with fewer than two crossings.
pub fn average_interval_ms(crossings: &[&Sample]) -> Option<f64> {
    let (first, last) = match crossings {
        [first, .., last] => (first, last),
        _ => return None,
    };
    let span = (last.timestamp_ms - first.timestamp_ms) as f64;
    Some(span / (crossings.len() - 1) as f64)
}

/// Unrounded BPM estimate, or `None` when it is unknown.
///
/// Unknown means fewer than two crossings, or crossings that share one
/// timestamp (a zero interval has no finite rate).
pub fn estimate_bpm(crossings: &[&Sample]) -> Option<f64> {
    let interval = average_interval_ms(crossings)?;
    if interval <= 0.0 {
        return None;
    }
    Some(MS_PER_MINUTE / interval)
}

/// BPM rounded to the nearest integer, as handed to the display.
pub fn rounded_bpm(crossings: &[&Sample]) -> Option<u32> {
    estimate_bpm(crossings).map(|bpm| bpm.round() as u32)
}
