//! Top-level entry point for running the pulse monitor as a native window.

use crate::config::PulseConfig;
use crate::device::DeviceSource;
use crate::session::MonitorSession;
use crate::sink::PulseSink;

use super::pulse_app::PulseApp;

/// Launch the pulse monitor in a native window.
///
/// Builds a [`MonitorSession`] over `source`, optionally publishing every
/// frame to `sink`, and enters the eframe event loop. Monitoring starts when
/// the user taps the BPM circle. The call blocks until the window is closed;
/// the session releases its device when dropped.
pub fn run_pulse_monitor(
    mut cfg: PulseConfig,
    source: Box<dyn DeviceSource>,
    sink: Option<PulseSink>,
) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let mut opts = cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(480.0, 720.0));
    }

    let mut session = MonitorSession::new(cfg, source);
    if let Some(sink) = sink {
        session = session.with_sink(sink);
    }
    let app = PulseApp::new(session);

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Phosphor icon font for the heart glyph.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
