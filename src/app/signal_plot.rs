//! Raw brightness plot: what the estimator actually sees.

use egui::Color32;
use egui_plot::{HLine, Legend, Line, Plot, Points};

use crate::estimator::{FrameOutput, PulseEstimator};

/// Draw the buffered samples against time (seconds since the oldest sample),
/// the window average, and a marker on the average at every crossing.
pub(super) fn show(
    ui: &mut egui::Ui,
    estimator: &PulseEstimator,
    last_output: Option<&FrameOutput>,
    color: Color32,
) {
    let t0 = estimator
        .samples()
        .next()
        .map(|s| s.timestamp_ms)
        .unwrap_or(0);
    let to_secs = |t: i64| (t - t0) as f64 / 1000.0;
    let raw: Vec<[f64; 2]> = estimator
        .samples()
        .map(|s| [to_secs(s.timestamp_ms), s.value])
        .collect();
    let summary = last_output.and_then(|o| o.summary.as_ref());

    Plot::new("signal_plot")
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("brightness", raw).color(color).width(1.5));
            let Some(summary) = summary else {
                return;
            };
            plot_ui.hline(HLine::new("average", summary.average).color(Color32::GRAY));
            let marks: Vec<[f64; 2]> = summary
                .crossing_times_ms
                .iter()
                .map(|t| [to_secs(*t), summary.average])
                .collect();
            if !marks.is_empty() {
                plot_ui.points(
                    Points::new("crossings", marks)
                        .radius(4.0)
                        .color(Color32::RED),
                );
            }
        });
}
