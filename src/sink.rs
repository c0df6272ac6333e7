//! Display sink: channel types for delivering per-frame results to a host.
//!
//! The estimator itself only returns values. Hosts that prefer push delivery
//! create a channel with [`channel_pulse`], hand the [`PulseSink`] to the
//! session and drain the receiver wherever the display lives.

use std::sync::mpsc::{Receiver, SendError, Sender};

/// A single point on the drawing surface, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Messages sent over the channel to drive a display.
#[derive(Debug, Clone, PartialEq)]
pub enum PulseUpdate {
    /// Blank the BPM readout (sent when a session starts).
    Clear,
    /// A new, rounded BPM value. Only sent when the estimate is known.
    Bpm(u32),
    /// The full waveform for the current frame, oldest sample first.
    Waveform(Vec<PlotPoint>),
}

/// Convenience sender for feeding a display.
#[derive(Clone)]
pub struct PulseSink {
    tx: Sender<PulseUpdate>,
}

impl PulseSink {
    /// Blank the BPM readout.
    #[inline]
    pub fn clear(&self) -> Result<(), SendError<PulseUpdate>> {
        self.tx.send(PulseUpdate::Clear)
    }

    /// Send a BPM value.
    #[inline]
    pub fn send_bpm(&self, bpm: u32) -> Result<(), SendError<PulseUpdate>> {
        self.tx.send(PulseUpdate::Bpm(bpm))
    }

    /// Replace the displayed waveform with `points`.
    pub fn send_waveform<I>(&self, points: I) -> Result<(), SendError<PulseUpdate>>
    where
        I: Into<Vec<PlotPoint>>,
    {
        self.tx.send(PulseUpdate::Waveform(points.into()))
    }
}

/// Create a new channel pair: `(PulseSink, Receiver<PulseUpdate>)`.
pub fn channel_pulse() -> (PulseSink, Receiver<PulseUpdate>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (PulseSink { tx }, rx)
}
