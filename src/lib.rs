//! FingerPulse crate root: re-exports and module wiring.
//!
//! Estimates a pulse rate from the brightness of a fingertip held over a
//! camera with its torch on, and renders the signal as a live waveform.
//!
//! - `data`: sample window, statistics, BPM and waveform normalization
//! - `estimator`: the per-sample pipeline (`on_sample -> FrameOutput`)
//! - `device`: capture-device traits, brightness extraction, synthetic finger
//! - `session`: device lifecycle, warm-up and frame ticking
//! - `sink`: channel types for pushing results to a display
//! - `config`: shared configuration
//! - `app`: egui/eframe window

pub mod app;
pub mod config;
pub mod data;
pub mod device;
pub mod error;
pub mod estimator;
pub mod session;
pub mod sink;

// Public re-exports for a compact external API
pub use app::{run_pulse_monitor, PulseApp};
pub use config::PulseConfig;
pub use data::samples::{Sample, SampleBuffer, SharedSampleBuffer};
pub use data::stats::{SignalStats, SignalSummary};
pub use data::waveform::Surface;
pub use device::{CaptureDevice, DeviceSource, Frame, Resolution, SyntheticFinger};
pub use error::MonitorError;
pub use estimator::{FrameOutput, PulseEstimator};
pub use session::{MonitorSession, SessionState};
pub use sink::{channel_pulse, PlotPoint, PulseSink, PulseUpdate};
