use std::cell::Cell;
use std::rc::Rc;

use fingerpulse::device::{CaptureDevice, DeviceSource, Frame, Resolution, SyntheticFinger};
use fingerpulse::{channel_pulse, MonitorError, MonitorSession, PulseConfig, PulseUpdate, SessionState};

const FRAME_MS: i64 = 16;

fn session_with(source: SyntheticFinger) -> MonitorSession {
    MonitorSession::new(PulseConfig::default(), Box::new(source))
}

/// Run frames every 16 ms from `from` (inclusive) to `to` (exclusive).
fn run(session: &mut MonitorSession, from: i64, to: i64) -> Option<fingerpulse::FrameOutput> {
    let mut last = None;
    let mut t = from;
    while t < to {
        if let Some(out) = session.tick(t) {
            last = Some(out);
        }
        t += FRAME_MS;
    }
    last
}

/// Fails every acquire once `fail` is set.
struct Flaky {
    inner: SyntheticFinger,
    fail: Rc<Cell<bool>>,
}

impl DeviceSource for Flaky {
    fn acquire(&mut self, resolution: Resolution) -> Result<Box<dyn CaptureDevice>, MonitorError> {
        if self.fail.get() {
            return Err(MonitorError::DeviceUnavailable("permission denied".to_string()));
        }
        self.inner.acquire(resolution)
    }
}

/// Opens synthetic cameras that have no frame ready at `gap_at`.
struct Gappy {
    inner: SyntheticFinger,
    gap_at: i64,
}

struct GappyCamera {
    inner: Box<dyn CaptureDevice>,
    gap_at: i64,
}

impl DeviceSource for Gappy {
    fn acquire(&mut self, resolution: Resolution) -> Result<Box<dyn CaptureDevice>, MonitorError> {
        let inner = self.inner.acquire(resolution)?;
        Ok(Box::new(GappyCamera {
            inner,
            gap_at: self.gap_at,
        }))
    }
}

impl CaptureDevice for GappyCamera {
    fn set_illumination(&mut self, on: bool) -> Result<(), MonitorError> {
        self.inner.set_illumination(on)
    }

    fn grab_frame(&mut self, timestamp_ms: i64) -> Option<Frame> {
        if timestamp_ms == self.gap_at {
            return None;
        }
        self.inner.grab_frame(timestamp_ms)
    }

    fn release(&mut self) {
        self.inner.release();
    }
}

#[test]
fn idle_session_does_nothing() {
    let mut session = session_with(SyntheticFinger::default());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.tick(0).is_none());
    session.stop();
    assert!(!session.is_active());
}

#[test]
fn warm_up_withholds_samples() {
    let finger = SyntheticFinger::default();
    let mut session = session_with(finger.clone());
    session.start(10_000).expect("device present");
    assert_eq!(session.state(), SessionState::WarmingUp { ready_at_ms: 11_500 });
    assert!(session.tick(10_016).is_none());
    assert!(session.tick(11_499).is_none());
    assert!(session.estimator().is_empty());
    assert_eq!(finger.status().frames, 0);

    assert!(session.tick(11_500).is_some());
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.estimator().len(), 1);
}

#[test]
fn missing_device_is_reported_and_session_stays_idle() {
    let mut session = session_with(SyntheticFinger::default().absent());
    match session.start(0) {
        Err(MonitorError::DeviceUnavailable(_)) => {}
        other => panic!("expected DeviceUnavailable, got {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.tick(5_000).is_none());
}

#[test]
fn failed_restart_leaves_buffer_untouched() {
    let fail = Rc::new(Cell::new(false));
    let source = Flaky {
        inner: SyntheticFinger::default(),
        fail: Rc::clone(&fail),
    };
    let mut session = MonitorSession::new(PulseConfig::default(), Box::new(source));
    session.start(0).unwrap();
    run(&mut session, 1_500, 2_500);
    let before = session.estimator().len();
    assert!(before > 0);
    session.stop();

    fail.set(true);
    assert!(session.start(3_000).is_err());
    assert_eq!(session.estimator().len(), before);
}

#[test]
fn restart_clears_previous_window() {
    let mut session = session_with(SyntheticFinger::default());
    session.start(0).unwrap();
    run(&mut session, 1_500, 3_000);
    session.stop();
    // the window survives stop and is only emptied by the next start
    assert!(!session.estimator().is_empty());
    session.start(4_000).unwrap();
    assert!(session.estimator().is_empty());
}

#[test]
fn missing_frame_is_skipped_without_stalling() {
    let source = Gappy {
        inner: SyntheticFinger::default(),
        gap_at: 1_532,
    };
    let mut session = MonitorSession::new(PulseConfig::default(), Box::new(source));
    session.start(0).unwrap();
    assert!(session.tick(1_500).is_some());
    assert!(session.tick(1_516).is_some());
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.estimator().len(), 2);

    assert!(session.tick(1_532).is_none());
    assert_eq!(session.estimator().len(), 2);
    assert_eq!(session.state(), SessionState::Running);

    assert!(session.tick(1_548).is_some());
    assert_eq!(session.estimator().len(), 3);
}

#[test]
fn huge_warm_up_saturates() {
    let cfg = PulseConfig {
        warm_up_ms: i64::MAX,
        ..PulseConfig::default()
    };
    let mut session = MonitorSession::new(cfg, Box::new(SyntheticFinger::default()));
    session.start(1_000).unwrap();
    assert_eq!(
        session.state(),
        SessionState::WarmingUp {
            ready_at_ms: i64::MAX
        }
    );
    assert!(session.tick(i64::MAX - 1).is_none());
}

#[test]
fn surface_set_before_tick_applies_to_that_frame() {
    let mut session = session_with(SyntheticFinger::default());
    session.start(0).unwrap();
    session.set_surface(300.0, 100.0);
    let out = session.tick(1_500).expect("warm-up over");
    // one sample in a 300-slot window on a 300 px surface: rightmost slot, baseline
    assert_eq!(out.waveform.len(), 1);
    assert_eq!(out.waveform[0].x, 299.0);
    assert_eq!(out.waveform[0].y, 6.0);
}

#[test]
fn missing_torch_is_not_fatal() {
    let finger = SyntheticFinger::default().without_torch();
    let mut session = session_with(finger.clone());
    session.start(0).expect("illumination failure must not abort start");
    assert!(!finger.status().torch_on);
    assert!(run(&mut session, 1_500, 2_000).is_some());
}

#[test]
fn stop_is_idempotent_and_releases_once() {
    let finger = SyntheticFinger::default();
    let mut session = session_with(finger.clone());
    session.start(0).unwrap();
    assert!(finger.status().torch_on);
    run(&mut session, 1_500, 1_600);

    session.stop();
    session.stop();
    let status = finger.status();
    assert_eq!(status.acquired, 1);
    assert_eq!(status.released, 1);
    assert!(!status.torch_on);
    assert!(session.tick(1_700).is_none());
}

#[test]
fn toggle_starts_and_stops() {
    let finger = SyntheticFinger::default();
    let mut session = session_with(finger.clone());
    session.toggle(0).unwrap();
    assert!(session.is_active());
    session.toggle(100).unwrap();
    assert!(!session.is_active());
    assert_eq!(finger.status().released, 1);
}

#[test]
fn starting_twice_keeps_one_device() {
    let finger = SyntheticFinger::default();
    let mut session = session_with(finger.clone());
    session.start(0).unwrap();
    session.start(50).unwrap();
    assert_eq!(finger.status().acquired, 1);
    assert_eq!(session.state(), SessionState::WarmingUp { ready_at_ms: 1_500 });
}

#[test]
fn dropping_session_releases_device() {
    let finger = SyntheticFinger::default();
    {
        let mut session = session_with(finger.clone());
        session.start(0).unwrap();
    }
    assert_eq!(finger.status().released, 1);
}

#[test]
fn synthetic_pulse_is_recovered() {
    let mut session = session_with(SyntheticFinger::new(72.0));
    session.start(0).unwrap();
    let out = run(&mut session, 1_500, 1_500 + 6_000).expect("frames after warm-up");
    assert_eq!(session.estimator().len(), 300);
    let bpm = out.bpm.expect("full window has crossings");
    assert!((70..=74).contains(&bpm), "estimated {bpm} bpm for a 72 bpm pulse");
}

#[test]
fn sink_receives_clear_then_frames() {
    let (sink, rx) = channel_pulse();
    let mut session = session_with(SyntheticFinger::new(60.0)).with_sink(sink);
    session.start(0).unwrap();
    run(&mut session, 1_500, 1_500 + 5_000);
    drop(session);

    let updates: Vec<PulseUpdate> = rx.try_iter().collect();
    assert_eq!(updates.first(), Some(&PulseUpdate::Clear));
    assert!(updates.iter().any(|u| matches!(u, PulseUpdate::Waveform(_))));
    let bpms: Vec<u32> = updates
        .iter()
        .filter_map(|u| match u {
            PulseUpdate::Bpm(b) => Some(*b),
            _ => None,
        })
        .collect();
    // early partial windows may be off; the full window must not be
    let last = *bpms.last().expect("a 5 s window of a 60 bpm pulse yields a rate");
    assert!((57..=63).contains(&last), "bpm values {bpms:?}");
}

#[test]
fn dropped_receiver_does_not_disturb_frames() {
    let (sink, rx) = channel_pulse();
    drop(rx);
    let mut session = session_with(SyntheticFinger::default()).with_sink(sink);
    session.start(0).unwrap();
    assert!(run(&mut session, 1_500, 2_000).is_some());
}
