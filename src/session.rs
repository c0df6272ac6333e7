//! Monitoring session: device lifecycle around a [`PulseEstimator`].
//!
//! A session is driven by the host's frame cadence. Each call to
//! [`MonitorSession::tick`] runs one complete frame synchronously; the host
//! must not call it re-entrantly. Timestamps are passed in by the caller so
//! the session itself never reads a clock.

use crate::config::PulseConfig;
use crate::data::waveform::Surface;
use crate::device::{average_brightness, CaptureDevice, DeviceSource};
use crate::error::MonitorError;
use crate::estimator::{FrameOutput, PulseEstimator};
use crate::sink::PulseSink;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No device held; ticks do nothing.
    Idle,
    /// Device open, waiting for exposure and torch to settle.
    WarmingUp { ready_at_ms: i64 },
    /// Every tick captures and processes a frame.
    Running,
}

/// One monitoring session.
pub struct MonitorSession {
    config: PulseConfig,
    source: Box<dyn DeviceSource>,
    device: Option<Box<dyn CaptureDevice>>,
    estimator: PulseEstimator,
    state: SessionState,
    sink: Option<PulseSink>,
}

impl MonitorSession {
    pub fn new(config: PulseConfig, source: Box<dyn DeviceSource>) -> Self {
        let surface = Surface {
            line_width: config.graph_width as f64,
            ..Surface::default()
        };
        let estimator = PulseEstimator::new(config.capacity, surface);
        Self {
            config,
            source,
            device: None,
            estimator,
            state: SessionState::Idle,
            sink: None,
        }
    }

    /// Also publish every frame's results to `sink`.
    pub fn with_sink(mut self, sink: PulseSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    pub fn estimator(&self) -> &PulseEstimator {
        &self.estimator
    }

    /// Resize the drawing surface the waveform is normalized to.
    pub fn set_surface(&mut self, width: f64, height: f64) {
        self.estimator.set_surface(Surface::new(
            width,
            height,
            self.config.graph_width as f64,
        ));
    }

    /// Open the device and begin warming up.
    ///
    /// If the device cannot be acquired the error is returned, the session
    /// stays idle and the sample window is left untouched. A missing torch is
    /// logged and ignored. Starting an active session does nothing.
    pub fn start(&mut self, now_ms: i64) -> Result<(), MonitorError> {
        if self.is_active() {
            return Ok(());
        }

        let mut device = match self.source.acquire(self.config.resolution) {
            Ok(device) => device,
            Err(e) => {
                log::error!("Failed to access camera: {e}");
                return Err(e);
            }
        };

        self.estimator.clear();
        if let Some(sink) = &self.sink {
            let _ = sink.clear();
        }

        if let Err(e) = device.set_illumination(true) {
            log::warn!("Starting torch failed, continuing without it: {e}");
        }

        self.device = Some(device);
        let ready_at_ms = now_ms.saturating_add(self.config.warm_up_ms);
        self.state = SessionState::WarmingUp { ready_at_ms };
        log::info!(
            "Monitoring started; waiting {} ms before sampling",
            self.config.warm_up_ms
        );
        Ok(())
    }

    /// Stop monitoring and release the device. Safe to call when idle.
    ///
    /// The state is reset before the device is touched, so no later tick can
    /// reach a released device. The sample window is kept for inspection
    /// until the next [`start`](Self::start) clears it.
    pub fn stop(&mut self) {
        if !self.is_active() {
            return;
        }
        self.state = SessionState::Idle;

        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.set_illumination(false) {
                log::debug!("Stopping torch failed: {e}");
            }
            device.release();
        }
        log::info!("Monitoring stopped");
    }

    /// Start when idle, stop when active.
    pub fn toggle(&mut self, now_ms: i64) -> Result<(), MonitorError> {
        if self.is_active() {
            self.stop();
            Ok(())
        } else {
            self.start(now_ms)
        }
    }

    /// Run one frame.
    ///
    /// Returns `None` when idle, while warming up, or when the device had no
    /// frame ready. A missing frame does not change any state.
    pub fn tick(&mut self, now_ms: i64) -> Option<FrameOutput> {
        match self.state {
            SessionState::Idle => return None,
            SessionState::WarmingUp { ready_at_ms } if now_ms < ready_at_ms => return None,
            SessionState::WarmingUp { .. } => {
                log::info!("Warm-up complete, starting main loop");
                self.state = SessionState::Running;
            }
            SessionState::Running => {}
        }

        let device = self.device.as_mut()?;
        let Some(frame) = device.grab_frame(now_ms) else {
            log::debug!("No frame available at {now_ms} ms, skipping");
            return None;
        };

        let value = average_brightness(&frame);
        let output = self.estimator.on_sample(value, now_ms);
        self.publish(&output);
        Some(output)
    }

    fn publish(&self, output: &FrameOutput) {
        let Some(sink) = &self.sink else {
            return;
        };
        // The receiver may be gone; the frame loop carries on regardless.
        if let Some(bpm) = output.bpm {
            let _ = sink.send_bpm(bpm);
        }
        let _ = sink.send_waveform(output.waveform.clone());
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        self.stop();
    }
}
