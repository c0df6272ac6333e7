use egui::Color32;
use egui_phosphor::regular::HEART;

use crate::estimator::FrameOutput;
use crate::session::{MonitorSession, SessionState};

/// eframe application wrapping a [`MonitorSession`].
///
/// Every repaint is one frame of the monitor: the session is ticked once,
/// then the BPM readout and the waveform are redrawn from the result.
pub struct PulseApp {
    session: MonitorSession,
    /// Last known BPM. Kept across frames whose estimate is unknown.
    displayed_bpm: Option<u32>,
    last_output: Option<FrameOutput>,
    graph_color: Color32,
    graph_width: f32,
    show_signal_plot: bool,
    /// Waveform area from the previous repaint; the next tick normalizes to it.
    surface_size: Option<egui::Vec2>,
    error: Option<String>,
}

impl PulseApp {
    pub fn new(session: MonitorSession) -> Self {
        let cfg = session.config();
        let [r, g, b, a] = cfg.graph_color;
        let graph_color = Color32::from_rgba_unmultiplied(r, g, b, a);
        let graph_width = cfg.graph_width;
        let show_signal_plot = cfg.show_signal_plot;
        Self {
            session,
            displayed_bpm: None,
            last_output: None,
            graph_color,
            graph_width,
            show_signal_plot,
            surface_size: None,
            error: None,
        }
    }

    pub fn session(&self) -> &MonitorSession {
        &self.session
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn toggle_monitoring(&mut self) {
        let starting = !self.session.is_active();
        match self.session.toggle(Self::now_ms()) {
            Ok(()) if starting => {
                self.displayed_bpm = None;
                self.last_output = None;
                self.error = None;
            }
            Ok(()) => {}
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn run_frame(&mut self) {
        if let Some(size) = self.surface_size {
            self.session.set_surface(size.x as f64, size.y as f64);
        }
        if let Some(output) = self.session.tick(Self::now_ms()) {
            if output.bpm.is_some() {
                self.displayed_bpm = output.bpm;
            }
            self.last_output = Some(output);
        }
    }

    fn bpm_display(&mut self, ui: &mut egui::Ui) {
        let readout = self
            .displayed_bpm
            .map(|bpm| bpm.to_string())
            .unwrap_or_default();
        let status = match self.session.state() {
            SessionState::Idle => "tap to start",
            SessionState::WarmingUp { .. } => "warming up…",
            SessionState::Running => "bpm",
        };
        let text = egui::RichText::new(format!("{HEART} {readout}\n{status}"))
            .size(36.0)
            .color(self.graph_color);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(text)
                .min_size(egui::vec2(200.0, 200.0))
                .corner_radius(100.0);
            if ui.add(button).on_hover_text("Heart rate").clicked() {
                self.toggle_monitoring();
            }
        });
    }

    fn waveform(&mut self, ui: &mut egui::Ui) {
        let desired = egui::vec2(ui.available_width(), ui.available_height().max(120.0));
        let (rect, _response) = ui.allocate_exact_size(desired, egui::Sense::hover());
        self.surface_size = Some(rect.size());

        let Some(output) = &self.last_output else {
            return;
        };
        let points: Vec<egui::Pos2> = output
            .waveform
            .iter()
            .map(|p| rect.min + egui::vec2(p.x as f32, p.y as f32))
            .collect();
        if points.len() < 2 {
            return;
        }
        ui.painter_at(rect).add(egui::Shape::line(
            points,
            egui::Stroke::new(self.graph_width, self.graph_color),
        ));
    }

    fn error_window(&mut self, ctx: &egui::Context) {
        let Some(msg) = self.error.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Camera")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!("Failed to access camera!\n{msg}"));
            });
        if !open {
            self.error = None;
        }
    }
}

impl eframe::App for PulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_frame();

        egui::TopBottomPanel::top("pulse_headline").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.heading("Heart Rate Monitor");
                    ui.label(egui::RichText::new("Tap the circle to start / stop").weak());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.checkbox(&mut self.show_signal_plot, "Signal");
                });
            });
        });

        if self.show_signal_plot {
            egui::TopBottomPanel::bottom("pulse_signal")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    super::signal_plot::show(
                        ui,
                        self.session.estimator(),
                        self.last_output.as_ref(),
                        self.graph_color,
                    );
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.bpm_display(ui);
            ui.add_space(12.0);
            self.waveform(ui);
        });

        self.error_window(ctx);

        // Keep frames coming while monitoring; an idle window only repaints on input.
        if self.session.is_active() {
            ctx.request_repaint();
        }
    }
}
