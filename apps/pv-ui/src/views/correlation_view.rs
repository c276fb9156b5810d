use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points};
use pv_app::{ActiveSelection, CorrelationPoint, correlation_points};

/// Scatter of measured against simulated values.
#[derive(Default)]
pub struct CorrelationView {
    points: Vec<CorrelationPoint>,
}

impl CorrelationView {
    pub fn refresh(&mut self, selection: &ActiveSelection) {
        self.points = correlation_points(selection);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.heading("Correlation");
        if self.points.is_empty() {
            ui.label("No simulated values match the measurements");
            return;
        }

        let mut by_observable: Vec<(&str, Vec<[f64; 2]>)> = Vec::new();
        for p in &self.points {
            let xy = [p.measured, p.simulated];
            match by_observable.iter_mut().find(|(id, _)| *id == p.observable_id) {
                Some((_, points)) => points.push(xy),
                None => by_observable.push((&p.observable_id, vec![xy])),
            }
        }

        let (lo, hi) = self
            .points
            .iter()
            .flat_map(|p| [p.measured, p.simulated])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        Plot::new("correlation_plot")
            .legend(Legend::default())
            .data_aspect(1.0)
            .x_axis_label("measurement")
            .y_axis_label("simulation")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[lo, lo], [hi, hi]]))
                        .style(LineStyle::dashed_dense())
                        .color(egui::Color32::GRAY),
                );
                for (observable, points) in by_observable {
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(3.0)
                            .name(observable),
                    );
                }
            });

        ui.label(format!("{} matched points", self.points.len()));
    }
}
