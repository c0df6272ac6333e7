//! Per-sample pulse estimation.
//!
//! [`PulseEstimator::on_sample`] is the whole per-frame pipeline:
//! push, recompute window statistics, derive BPM, derive the waveform. It has
//! no side effects beyond updating its own sample window.

use crate::data::bpm::rounded_bpm;
use crate::data::samples::{Sample, SampleBuffer};
use crate::data::stats::{analyze, SignalSummary};
use crate::data::waveform::{normalize_waveform, Surface};
use crate::sink::PlotPoint;

/// Result of processing one sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutput {
    /// Rounded BPM, or `None` while fewer than two crossings are in the window.
    pub bpm: Option<u32>,
    /// Surface-space trace for the current window.
    pub waveform: Vec<PlotPoint>,
    /// Window statistics the estimate was derived from.
    pub summary: Option<SignalSummary>,
}

/// Owns the sample window and the surface geometry used for the waveform.
#[derive(Debug, Clone, Default)]
pub struct PulseEstimator {
    buffer: SampleBuffer,
    surface: Surface,
}

impl PulseEstimator {
    pub fn new(capacity: usize, surface: Surface) -> Self {
        Self {
            buffer: SampleBuffer::new(capacity),
            surface,
        }
    }

    /// Ingest one brightness value and recompute everything from the window.
    pub fn on_sample(&mut self, value: f64, timestamp_ms: i64) -> FrameOutput {
        self.buffer.push(value, timestamp_ms);
        self.current()
    }

    /// Outputs for the window as it stands, without ingesting anything.
    pub fn current(&self) -> FrameOutput {
        let Some(stats) = analyze(self.buffer.snapshot()) else {
            return FrameOutput::default();
        };
        let bpm = rounded_bpm(&stats.crossings);
        let waveform = normalize_waveform(
            self.buffer.snapshot(),
            &stats,
            self.buffer.capacity(),
            &self.surface,
        );
        FrameOutput {
            bpm,
            waveform,
            summary: Some(stats.summary()),
        }
    }

    /// Drop all buffered samples.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Buffered samples, oldest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> + Clone + '_ {
        self.buffer.snapshot()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}
