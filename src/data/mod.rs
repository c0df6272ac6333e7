pub mod bpm;
pub mod samples;
pub mod stats;
pub mod waveform;
