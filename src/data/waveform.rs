//! Mapping of buffered samples to drawing-surface coordinates.

use crate::data::samples::Sample;
use crate::data::stats::SignalStats;
use crate::sink::PlotPoint;

/// Size of the drawing surface in pixels, plus the stroke width used as the
/// baseline offset so the trace never clips at the top or bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub line_width: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 200.0,
            line_width: 6.0,
        }
    }
}

impl Surface {
    pub fn new(width: f64, height: f64, line_width: f64) -> Self {
        Self {
            width,
            height,
            line_width,
        }
    }

    /// Y coordinate used for flat windows and zero-valued samples.
    pub fn baseline(&self) -> f64 {
        self.line_width
    }

    /// Usable vertical extent; never negative.
    pub fn drawable_height(&self) -> f64 {
        (self.height - self.line_width * 2.0).max(0.0)
    }
}

/// Normalize a snapshot into a right-aligned trace.
///
/// Each slot is `width / capacity` wide and the trace is offset by the number
/// of unfilled slots, so a filling buffer grows leftwards from the right edge
/// and a full one scrolls. A point whose y equals the previous point's y is
/// not emitted.
pub fn normalize_waveform<'a, I>(
    snapshot: I,
    stats: &SignalStats<'_>,
    capacity: usize,
    surface: &Surface,
) -> Vec<PlotPoint>
where
    I: IntoIterator<Item = &'a Sample>,
    I::IntoIter: ExactSizeIterator,
{
    let samples = snapshot.into_iter();
    let capacity = capacity.max(1);
    let x_scale = surface.width / capacity as f64;
    let x_offset = capacity.saturating_sub(samples.len()) as f64 * x_scale;
    let baseline = surface.baseline();
    let drawable = surface.drawable_height();

    let mut points = Vec::with_capacity(samples.len());
    let mut previous_y = 0.0;
    for (i, sample) in samples.enumerate() {
        let x = x_scale * i as f64 + x_offset;
        let y = if stats.is_flat() || sample.value == 0.0 {
            baseline
        } else {
            baseline + drawable * (sample.value - stats.min) / stats.range
        };

        if y != previous_y {
            points.push(PlotPoint { x, y });
        }
        previous_y = y;
    }
    points
}
