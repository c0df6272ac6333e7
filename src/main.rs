//! Pulse monitor demo.
//!
//! Runs the monitor against a simulated fingertip. Pass a JSON config path as
//! the first argument to override defaults; set `FINGERPULSE_SIM_BPM` to
//! change the simulated rate and `RUST_LOG=info` to see lifecycle logs.
//!
//! ```bash
//! RUST_LOG=info cargo run -- pulse.json
//! ```

use std::path::PathBuf;

use fingerpulse::{channel_pulse, run_pulse_monitor, PulseConfig, PulseUpdate, SyntheticFinger};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let cfg = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => PulseConfig::load(&path).unwrap_or_else(|e| {
            log::error!("Failed to load config {}: {e}; using defaults", path.display());
            PulseConfig::default()
        }),
        None => PulseConfig::default(),
    };

    let sim_bpm = std::env::var("FINGERPULSE_SIM_BPM")
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(72.0);

    // Log BPM changes from the display channel.
    let (sink, rx) = channel_pulse();
    std::thread::spawn(move || {
        let mut last = None;
        for update in rx {
            match update {
                PulseUpdate::Clear => last = None,
                PulseUpdate::Bpm(bpm) if last != Some(bpm) => {
                    log::info!("Heart rate: {bpm} bpm");
                    last = Some(bpm);
                }
                _ => {}
            }
        }
    });

    run_pulse_monitor(cfg, Box::new(SyntheticFinger::new(sim_bpm)), Some(sink))
}
