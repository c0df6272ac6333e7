//! Capture-device boundary.
//!
//! The monitor does not talk to camera hardware directly. A [`DeviceSource`]
//! hands out [`CaptureDevice`]s, and each frame they produce is reduced to a
//! single brightness value by [`average_brightness`]. [`SyntheticFinger`] is a
//! software device that renders a fingertip pulse, used by the demo binary
//! and by the tests.

use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Requested capture size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
        }
    }
}

/// One captured frame as tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// A frame where every pixel has the same colour.
    pub fn filled(resolution: Resolution, rgba: [u8; 4]) -> Self {
        let pixels = resolution.width as usize * resolution.height as usize;
        Self {
            width: resolution.width,
            height: resolution.height,
            rgba: rgba.repeat(pixels),
        }
    }
}

/// Mean of the red and green channels over all pixels, scaled to [0, 1].
///
/// Blue and alpha are ignored. An empty frame yields 0.0, which downstream
/// treats as "no data".
pub fn average_brightness(frame: &Frame) -> f64 {
    let mut sum: u64 = 0;
    let mut pixels: u64 = 0;
    for px in frame.rgba.chunks_exact(4) {
        sum += px[0] as u64 + px[1] as u64;
        pixels += 1;
    }
    if pixels == 0 {
        return 0.0;
    }
    sum as f64 / (pixels * 2) as f64 / 255.0
}

/// An opened camera.
pub trait CaptureDevice {
    /// Switch the torch on or off.
    fn set_illumination(&mut self, on: bool) -> Result<(), MonitorError>;
    /// Capture the frame current at `timestamp_ms`; `None` if no frame is ready.
    fn grab_frame(&mut self, timestamp_ms: i64) -> Option<Frame>;
    /// Close the device. Further calls on it are not expected.
    fn release(&mut self);
}

/// Something that can open a camera.
pub trait DeviceSource {
    fn acquire(&mut self, resolution: Resolution) -> Result<Box<dyn CaptureDevice>, MonitorError>;
}

/// Observable state of a [`SyntheticFinger`] and the devices it opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntheticStatus {
    pub acquired: usize,
    pub released: usize,
    pub torch_on: bool,
    pub frames: usize,
}

/// Simulated fingertip pressed against a camera lens.
///
/// Produces a PPG-like brightness: a sharp systolic dip followed by a small
/// dicrotic dip once per beat. With the torch on the signal is bright and
/// strong; without it, dim and weak.
#[derive(Clone)]
pub struct SyntheticFinger {
    /// Simulated pulse rate.
    pub bpm: f64,
    /// Whether the simulated camera has a controllable torch.
    pub has_torch: bool,
    /// Whether a camera is present at all.
    pub present: bool,
    status: Arc<Mutex<SyntheticStatus>>,
}

impl Default for SyntheticFinger {
    fn default() -> Self {
        Self::new(72.0)
    }
}

impl SyntheticFinger {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            has_torch: true,
            present: true,
            status: Arc::new(Mutex::new(SyntheticStatus::default())),
        }
    }

    pub fn without_torch(mut self) -> Self {
        self.has_torch = false;
        self
    }

    pub fn absent(mut self) -> Self {
        self.present = false;
        self
    }

    /// Snapshot of counters shared with every device this source opened.
    pub fn status(&self) -> SyntheticStatus {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Brightness at `timestamp_ms`, in [0, 1].
    pub fn brightness_at(bpm: f64, torch_on: bool, timestamp_ms: i64) -> f64 {
        let phase = (timestamp_ms as f64 * bpm / 60_000.0).rem_euclid(1.0);
        let bump = |centre: f64, width: f64| (-((phase - centre) / width).powi(2)).exp();
        let absorption = bump(0.3, 0.12) + 0.05 * bump(0.65, 0.1);
        // slow baseline wander, well below the pulse amplitude
        let wander = 0.002 * (2.0 * PI * timestamp_ms as f64 / 7_000.0).sin();
        let (base, depth) = if torch_on { (0.62, 0.1) } else { (0.18, 0.03) };
        (base - depth * absorption + wander).clamp(0.0, 1.0)
    }
}

impl DeviceSource for SyntheticFinger {
    fn acquire(&mut self, resolution: Resolution) -> Result<Box<dyn CaptureDevice>, MonitorError> {
        if !self.present {
            return Err(MonitorError::DeviceUnavailable(
                "no video input device found".to_string(),
            ));
        }
        if let Ok(mut status) = self.status.lock() {
            status.acquired += 1;
        }
        Ok(Box::new(SyntheticCamera {
            bpm: self.bpm,
            has_torch: self.has_torch,
            torch_on: false,
            released: false,
            resolution,
            status: Arc::clone(&self.status),
        }))
    }
}

struct SyntheticCamera {
    bpm: f64,
    has_torch: bool,
    torch_on: bool,
    released: bool,
    resolution: Resolution,
    status: Arc<Mutex<SyntheticStatus>>,
}

impl CaptureDevice for SyntheticCamera {
    fn set_illumination(&mut self, on: bool) -> Result<(), MonitorError> {
        if !self.has_torch {
            return Err(MonitorError::IlluminationUnsupported);
        }
        self.torch_on = on;
        if let Ok(mut status) = self.status.lock() {
            status.torch_on = on;
        }
        Ok(())
    }

    fn grab_frame(&mut self, timestamp_ms: i64) -> Option<Frame> {
        if self.released {
            return None;
        }
        let value = SyntheticFinger::brightness_at(self.bpm, self.torch_on, timestamp_ms);
        let level = (value * 255.0).round() as u8;
        if let Ok(mut status) = self.status.lock() {
            status.frames += 1;
        }
        Some(Frame::filled(self.resolution, [level, level, 0, 255]))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Ok(mut status) = self.status.lock() {
            status.released += 1;
        }
    }
}
