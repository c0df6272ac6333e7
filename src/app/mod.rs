//! Native window for the pulse monitor.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`pulse_app`]     | [`PulseApp`]: per-frame ticking, BPM readout, waveform stroke |
//! | [`signal_plot`]   | Raw brightness plot with window average and crossings |
//! | [`run`]           | Top-level [`run_pulse_monitor()`] entry point |

mod pulse_app;
mod run;
mod signal_plot;

pub use pulse_app::PulseApp;
pub use run::run_pulse_monitor;
