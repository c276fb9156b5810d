//! Figures and series derived from the active selection.
//!
//! Pure functions of an [`ActiveSelection`]; frontends call them from their
//! plot sinks.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use pv_core::TableCategory;
use pv_core::columns::*;
use pv_table::{CellValue, DataPoint, LoadedTable, data_points};

use crate::error::UserWarning;
use crate::selection::{ActiveSelection, ActiveTable};

pub const DEFAULT_PLOT_ID: &str = "default plot";

/// Axis scale named in a visualization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Lin,
    Log,
    Log10,
}

impl AxisScale {
    fn parse(s: &str) -> Self {
        match s.trim() {
            "log" => AxisScale::Log,
            "log10" => AxisScale::Log10,
            _ => AxisScale::Lin,
        }
    }

    /// Maps a data value onto the axis; non-positive values vanish on log axes.
    pub fn apply(self, v: f64) -> Option<f64> {
        match self {
            AxisScale::Lin => Some(v),
            AxisScale::Log if v > 0.0 => Some(v.ln()),
            AxisScale::Log10 if v > 0.0 => Some(v.log10()),
            _ => None,
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AxisScale::Lin => "lin",
            AxisScale::Log => "log",
            AxisScale::Log10 => "log10",
        })
    }
}

/// One visualization row with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub plot_id: String,
    pub dataset_id: Option<String>,
    pub x_values: String,
    /// Observable to draw; `None` draws every observable.
    pub y_values: Option<String>,
    pub x_offset: f64,
    pub y_offset: f64,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub legend: String,
}

impl PlotSpec {
    pub fn from_row(table: &LoadedTable, row: usize) -> Self {
        let text = |column: &str| {
            table
                .column_index(column)
                .and_then(|c| table.cell(row, c))
                .and_then(CellValue::as_text)
                .filter(|s| !s.is_empty())
        };
        let number = |column: &str| {
            table
                .column_index(column)
                .and_then(|c| table.cell(row, c))
                .and_then(CellValue::as_f64)
                .unwrap_or(0.0)
        };

        let dataset_id = text(DATASET_ID);
        let x_values = text(X_VALUES).unwrap_or_else(|| TIME.to_string());
        let y_values = text(Y_VALUES);
        PlotSpec {
            plot_id: text(PLOT_ID).unwrap_or_default(),
            x_label: text(X_LABEL).unwrap_or_else(|| x_values.clone()),
            y_label: text(Y_LABEL)
                .or_else(|| y_values.clone())
                .unwrap_or_else(|| MEASUREMENT.to_string()),
            x_scale: text(X_SCALE).map(|s| AxisScale::parse(&s)).unwrap_or_default(),
            y_scale: text(Y_SCALE).map(|s| AxisScale::parse(&s)).unwrap_or_default(),
            x_offset: number(X_OFFSET),
            y_offset: number(Y_OFFSET),
            legend: text(LEGEND_ENTRY)
                .or_else(|| dataset_id.clone())
                .unwrap_or_default(),
            dataset_id,
            x_values,
            y_values,
        }
    }

    fn selects(&self, point: &DataPoint) -> bool {
        self.dataset_id
            .as_ref()
            .is_none_or(|d| point.dataset_id.as_ref() == Some(d))
            && self
                .y_values
                .as_ref()
                .is_none_or(|y| &point.observable_id == y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Measurement,
    Simulation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    /// `[x, y]` pairs sorted by x, already offset and scaled.
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotFigure {
    pub plot_id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub series: Vec<Series>,
}

/// Everything a plot view needs, plus the problems met while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotSet {
    pub figures: Vec<PlotFigure>,
    pub warnings: Vec<UserWarning>,
}

/// A measured value paired with the simulated one for the same observable,
/// condition and time.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPoint {
    pub observable_id: String,
    pub condition_id: String,
    pub time: f64,
    pub measured: f64,
    pub simulated: f64,
}

/// Plot ids in order of first appearance.
pub fn plot_ids(visualization: &LoadedTable) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for cell in visualization.column(PLOT_ID).into_iter().flatten() {
        if let Some(id) = cell.as_text()
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    ids
}

/// `plotName` of the first row of `plot_id`, else the id itself.
pub fn plot_title(visualization: &LoadedTable, plot_id: &str) -> String {
    rows_of(visualization, plot_id)
        .into_iter()
        .find_map(|row| {
            visualization
                .column_index(PLOT_NAME)
                .and_then(|c| visualization.cell(row, c))
                .and_then(CellValue::as_text)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| plot_id.to_string())
}

/// Plot ids that carry more than one distinct `plotName`.
pub fn conflicting_plot_names(visualization: &LoadedTable) -> Vec<UserWarning> {
    let Some(name_column) = visualization.column_index(PLOT_NAME) else {
        return Vec::new();
    };
    plot_ids(visualization)
        .into_iter()
        .filter_map(|id| {
            let mut names: Vec<String> = rows_of(visualization, &id)
                .into_iter()
                .filter_map(|row| visualization.cell(row, name_column))
                .filter_map(CellValue::as_text)
                .collect();
            names.sort();
            names.dedup();
            (names.len() > 1).then(|| {
                UserWarning::new(format!(
                    "Plot '{id}' has several plot names ({}); using the first",
                    names.join(", ")
                ))
            })
        })
        .collect()
}

/// Plot types other than raw lines are drawn as lines anyway; say so once
/// per distinct value.
pub fn unsupported_plot_types(visualization: &LoadedTable) -> Vec<UserWarning> {
    let mut warnings = Vec::new();
    for (column, drawn_as_is) in [(PLOT_TYPE_SIMULATION, "LinePlot"), (PLOT_TYPE_DATA, "replicate")] {
        let mut seen: Vec<String> = Vec::new();
        for value in visualization
            .column(column)
            .into_iter()
            .flatten()
            .filter_map(CellValue::as_text)
        {
            if !value.is_empty() && value != drawn_as_is && !seen.contains(&value) {
                warnings.push(UserWarning::new(format!(
                    "{column} '{value}' is not supported; drawn as a line plot"
                )));
                seen.push(value);
            }
        }
    }
    warnings
}

fn rows_of(visualization: &LoadedTable, plot_id: &str) -> Vec<usize> {
    let Some(column) = visualization.column_index(PLOT_ID) else {
        return Vec::new();
    };
    (0..visualization.row_count())
        .filter(|&row| {
            visualization
                .cell(row, column)
                .and_then(CellValue::as_text)
                .is_some_and(|id| id == plot_id)
        })
        .collect()
}

/// Builds every figure the selection describes.
///
/// Lines whose data cannot be read are skipped and reported as warnings.
/// An unplottable selection yields an empty set.
pub fn build_plots(selection: &ActiveSelection) -> PlotSet {
    let mut set = PlotSet::default();
    let Some(measurement) = selection.get(TableCategory::Measurement) else {
        return set;
    };
    if !selection.is_plottable() {
        return set;
    }
    let simulation = selection.get(TableCategory::Simulation);

    match selection.visualization() {
        Some(visualization) => {
            set.warnings.extend(conflicting_plot_names(visualization));
            set.warnings.extend(unsupported_plot_types(visualization));
            for plot_id in plot_ids(visualization) {
                let specs: Vec<PlotSpec> = rows_of(visualization, &plot_id)
                    .into_iter()
                    .map(|row| PlotSpec::from_row(visualization, row))
                    .collect();
                let Some(first) = specs.first() else { continue };
                let mut figure = PlotFigure {
                    title: plot_title(visualization, &plot_id),
                    x_label: first.x_label.clone(),
                    y_label: first.y_label.clone(),
                    x_scale: first.x_scale,
                    y_scale: first.y_scale,
                    plot_id,
                    series: Vec::new(),
                };
                for spec in &specs {
                    let warnings = &mut set.warnings;
                    push_series(&mut figure, spec, measurement, SeriesKind::Measurement, warnings);
                    if let Some(simulation) = simulation {
                        push_series(&mut figure, spec, simulation, SeriesKind::Simulation, warnings);
                    }
                }
                set.figures.push(figure);
            }
        }
        None => {
            let mut figure = PlotFigure {
                plot_id: DEFAULT_PLOT_ID.to_string(),
                title: DEFAULT_PLOT_ID.to_string(),
                x_label: TIME.to_string(),
                y_label: MEASUREMENT.to_string(),
                x_scale: AxisScale::Lin,
                y_scale: AxisScale::Lin,
                series: Vec::new(),
            };
            let warnings = &mut set.warnings;
            push_default_series(&mut figure, measurement, SeriesKind::Measurement, warnings);
            if let Some(simulation) = simulation {
                push_default_series(&mut figure, simulation, SeriesKind::Simulation, warnings);
            }
            set.figures.push(figure);
        }
    }
    set
}

/// Warnings the current selection raises when plotted.
pub fn selection_warnings(selection: &ActiveSelection) -> Vec<UserWarning> {
    build_plots(selection).warnings
}

fn value_column(kind: SeriesKind) -> &'static str {
    match kind {
        SeriesKind::Measurement => MEASUREMENT,
        SeriesKind::Simulation => SIMULATION,
    }
}

fn read_points(
    active: &ActiveTable,
    x_column: &str,
    kind: SeriesKind,
    warnings: &mut Vec<UserWarning>,
) -> Option<Vec<DataPoint>> {
    match data_points(&active.table, x_column, value_column(kind)) {
        Ok(points) => Some(points),
        Err(e) => {
            let path = active
                .table
                .source()
                .map(Path::display)
                .map(|p| p.to_string())
                .unwrap_or_else(|| active.key.filename.clone());
            warnings.push(UserWarning::new(format!("Cannot plot {path}: {e}")));
            None
        }
    }
}

fn push_series(
    figure: &mut PlotFigure,
    spec: &PlotSpec,
    active: &ActiveTable,
    kind: SeriesKind,
    warnings: &mut Vec<UserWarning>,
) {
    let Some(points) = read_points(active, &spec.x_values, kind, warnings) else {
        return;
    };
    let mut xy: Vec<[f64; 2]> = points
        .iter()
        .filter(|p| spec.selects(p))
        .filter_map(|p| {
            Some([
                spec.x_scale.apply(p.x + spec.x_offset)?,
                spec.y_scale.apply(p.value + spec.y_offset)?,
            ])
        })
        .collect();
    sort_by_x(&mut xy);

    let label = match kind {
        SeriesKind::Measurement => spec.legend.clone(),
        SeriesKind::Simulation => format!("{} (simulation)", spec.legend),
    };
    figure.series.push(Series {
        label,
        kind,
        points: xy,
    });
}

/// One line per dataset id, or per observable id when there is none.
fn push_default_series(
    figure: &mut PlotFigure,
    active: &ActiveTable,
    kind: SeriesKind,
    warnings: &mut Vec<UserWarning>,
) {
    let Some(points) = read_points(active, TIME, kind, warnings) else {
        return;
    };
    let mut lines: Vec<(String, Vec<[f64; 2]>)> = Vec::new();
    for point in &points {
        let label = point
            .dataset_id
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| point.observable_id.clone());
        match lines.iter_mut().find(|(l, _)| *l == label) {
            Some((_, xy)) => xy.push([point.x, point.value]),
            None => lines.push((label, vec![[point.x, point.value]])),
        }
    }
    for (label, mut xy) in lines {
        sort_by_x(&mut xy);
        let label = match kind {
            SeriesKind::Measurement => label,
            SeriesKind::Simulation => format!("{label} (simulation)"),
        };
        figure.series.push(Series {
            label,
            kind,
            points: xy,
        });
    }
}

fn sort_by_x(xy: &mut [[f64; 2]]) {
    xy.sort_by(|a, b| a[0].total_cmp(&b[0]));
}

/// Pairs measurements with simulated values; empty without a simulation.
pub fn correlation_points(selection: &ActiveSelection) -> Vec<CorrelationPoint> {
    let (Some(measurement), Some(simulation)) = (selection.measurement(), selection.simulation())
    else {
        return Vec::new();
    };
    let (Ok(measured), Ok(simulated)) = (
        data_points(measurement, TIME, MEASUREMENT),
        data_points(simulation, TIME, SIMULATION),
    ) else {
        return Vec::new();
    };

    let mut by_key: HashMap<(&str, &str, u64), f64> = HashMap::new();
    for p in &simulated {
        by_key
            .entry((p.observable_id.as_str(), p.condition_id.as_str(), p.x.to_bits()))
            .or_insert(p.value);
    }

    measured
        .iter()
        .filter_map(|m| {
            let key = (m.observable_id.as_str(), m.condition_id.as_str(), m.x.to_bits());
            let simulated = *by_key.get(&key)?;
            Some(CorrelationPoint {
                observable_id: m.observable_id.clone(),
                condition_id: m.condition_id.clone(),
                time: m.x,
                measured: m.value,
                simulated,
            })
        })
        .collect()
}
