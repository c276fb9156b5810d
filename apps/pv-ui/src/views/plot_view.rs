use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points};
use pv_app::{ActiveSelection, AxisScale, PlotFigure, PlotSet, SeriesKind, build_plots};

#[derive(Default)]
pub struct PlotView {
    plots: PlotSet,
    selected: usize,
}

impl PlotView {
    /// Rebuilds the figures; keeps the selected plot id when it still exists.
    pub fn refresh(&mut self, selection: &ActiveSelection) {
        let previous = self
            .plots
            .figures
            .get(self.selected)
            .map(|f| f.plot_id.clone());
        self.plots = build_plots(selection);
        self.selected = previous
            .and_then(|id| self.plots.figures.iter().position(|f| f.plot_id == id))
            .unwrap_or(0);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.plots.figures.is_empty() {
            ui.label("Open a PEtab YAML file to plot its measurements");
            return;
        }

        ui.horizontal(|ui| {
            ui.label("Plot:");
            let current = self
                .plots
                .figures
                .get(self.selected)
                .map(|f| f.title.clone())
                .unwrap_or_default();
            egui::ComboBox::from_id_salt("plot_selector")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (i, figure) in self.plots.figures.iter().enumerate() {
                        ui.selectable_value(&mut self.selected, i, &figure.title);
                    }
                });
        });
        ui.separator();

        if let Some(figure) = self.plots.figures.get(self.selected) {
            show_figure(ui, figure);
        }
    }
}

fn axis_label(label: &str, scale: AxisScale) -> String {
    match scale {
        AxisScale::Lin => label.to_string(),
        _ => format!("{label} ({scale})"),
    }
}

fn show_figure(ui: &mut egui::Ui, figure: &PlotFigure) {
    Plot::new(("petab_plot", &figure.plot_id))
        .legend(Legend::default())
        .x_axis_label(axis_label(&figure.x_label, figure.x_scale))
        .y_axis_label(axis_label(&figure.y_label, figure.y_scale))
        .show(ui, |plot_ui| {
            for series in &figure.series {
                if series.points.is_empty() {
                    continue;
                }
                let line = Line::new(PlotPoints::from(series.points.clone())).name(&series.label);
                match series.kind {
                    SeriesKind::Measurement => {
                        plot_ui.line(line);
                        plot_ui.points(
                            Points::new(PlotPoints::from(series.points.clone()))
                                .radius(3.0)
                                .name(&series.label),
                        );
                    }
                    SeriesKind::Simulation => {
                        plot_ui.line(line.style(LineStyle::dashed_loose()));
                    }
                }
            }
        });
}
