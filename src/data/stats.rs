//! Window statistics and mean-crossing detection.
//!
//! Everything here is recomputed from scratch over the whole snapshot on every
//! call; there is no running state. A crossing is a falling edge through the
//! window average: the previous sample strictly above it, the current sample
//! strictly below it.

use crate::data::samples::Sample;

/// Statistics of one snapshot. Crossings borrow from the snapshot they were
/// computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalStats<'a> {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// `max - min`; zero for a perfectly flat window.
    pub range: f64,
    pub crossings: Vec<&'a Sample>,
}

/// Owned copy of [`SignalStats`] that can outlive the snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub crossing_times_ms: Vec<i64>,
}

impl SignalStats<'_> {
    pub fn is_flat(&self) -> bool {
        self.range == 0.0
    }

    pub fn summary(&self) -> SignalSummary {
        SignalSummary {
            average: self.average,
            min: self.min,
            max: self.max,
            range: self.range,
            crossing_times_ms: self.crossings.iter().map(|s| s.timestamp_ms).collect(),
        }
    }
}

/// Compute average, extrema, range and falling mean-crossings of a snapshot.
///
/// Returns `None` for an empty snapshot.
pub fn analyze<'a, I>(snapshot: I) -> Option<SignalStats<'a>>
where
    I: IntoIterator<Item = &'a Sample>,
    I::IntoIter: Clone,
{
    let iter = snapshot.into_iter();
    let mut scan = iter.clone();
    let first = scan.next()?;

    let mut sum = first.value;
    let mut count = 1usize;
    let mut min = first.value;
    let mut max = first.value;
    for sample in scan {
        sum += sample.value;
        count += 1;
        if sample.value > max {
            max = sample.value;
        }
        if sample.value < min {
            min = sample.value;
        }
    }

    let average = sum / count as f64;
    let crossings = mean_crossings(iter, average);
    Some(SignalStats {
        average,
        min,
        max,
        range: max - min,
        crossings,
    })
}

/// Samples at which the signal falls through `average`.
///
/// The scan is seeded with the first sample as `previous`, so the first sample
/// itself can never qualify.
pub fn mean_crossings<'a, I>(samples: I, average: f64) -> Vec<&'a Sample>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut iter = samples.into_iter();
    let Some(mut previous) = iter.next() else {
        return Vec::new();
    };

    let mut crossings = Vec::new();
    for current in iter {
        if current.value < average && previous.value > average {
            crossings.push(current);
        }
        previous = current;
    }
    crossings
}
