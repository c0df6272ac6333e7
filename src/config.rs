//! Configuration for the pulse monitor and its window.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::samples::DEFAULT_CAPACITY;
use crate::device::Resolution;
use crate::error::MonitorError;

/// Default pause between enabling the camera and trusting its samples.
pub const DEFAULT_WARM_UP_MS: i64 = 1500;

/// Top-level configuration.
///
/// | Field              | Purpose |
/// |--------------------|---------|
/// | `capacity`         | Samples retained in the analysis window |
/// | `warm_up_ms`       | Delay after device setup before the first sample |
/// | `resolution`       | Frame size requested for brightness extraction |
/// | `graph_width`      | Waveform stroke width; also the baseline offset |
/// | `graph_color`      | Waveform stroke colour (RGBA) |
///
/// Files written by [`PulseConfig::save`] may omit any field; missing fields
/// take their default.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    // ── Signal ───────────────────────────────────────────────────────────────
    /// Capacity of the sample window (300 = 5 s at 60 fps).
    pub capacity: usize,
    /// Warm-up delay in milliseconds.
    pub warm_up_ms: i64,
    /// Target capture resolution.
    pub resolution: Resolution,

    // ── Appearance ───────────────────────────────────────────────────────────
    pub graph_width: f32,
    pub graph_color: [u8; 4],
    /// Show the raw signal plot with average and crossings below the waveform.
    pub show_signal_plot: bool,

    // ── Window ───────────────────────────────────────────────────────────────
    /// Native window title.
    pub title: String,
    /// Optional eframe native-window options.
    #[serde(skip)]
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            warm_up_ms: DEFAULT_WARM_UP_MS,
            resolution: Resolution::default(),

            graph_width: 6.0,
            graph_color: [0x28, 0x66, 0xeb, 0xff],
            show_signal_plot: false,

            title: "Heart Rate Monitor".to_string(),
            native_options: None,
        }
    }
}

impl PulseConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MonitorError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), MonitorError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
