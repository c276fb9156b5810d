use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use pv_app::{
    AppError, Coordinator, CoordinatorEvent, EventChannel, NO_VISUALIZATION_WARNING,
    OPEN_MANIFEST_FIRST, SelectionState, TableKey, build_plots, correlation_points,
};
use pv_core::TableCategory;

const MEASUREMENT: &str = "observableId\tsimulationConditionId\tmeasurement\ttime\tdatasetId\n\
    obs_a\tc0\t1.0\t0\td1\n\
    obs_a\tc0\t2.0\t1\td1\n\
    obs_b\tc1\t4.0\t0\td2\n";
const CONDITIONS: &str = "conditionId\tconditionName\tk1\nc0\tcontrol\t1\nc1\ttreated\t2\n";
const VISUALIZATION: &str = "plotId\tplotName\tdatasetId\tlegendEntry\n\
    p1\tFirst\td1\tA\n\
    p2\tSecond\td2\tB\n";
const OBSERVABLES: &str = "observableId\tobservableFormula\tnoiseFormula\nobs_a\tx\t1\n";
const SIMULATION: &str = "observableId\tsimulationConditionId\tsimulation\ttime\n\
    obs_a\tc0\t1.5\t0\n\
    obs_a\tc0\t2.5\t1\n\
    obs_a\tc9\t0.5\t0\n";

fn fixture(name: &str, with_visualization: bool) -> PathBuf {
    let dir = std::env::temp_dir().join("pv_app_flow").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("meas.tsv"), MEASUREMENT).unwrap();
    std::fs::write(dir.join("meas_copy.tsv"), MEASUREMENT).unwrap();
    std::fs::write(dir.join("cond.tsv"), CONDITIONS).unwrap();
    std::fs::write(dir.join("obs.tsv"), OBSERVABLES).unwrap();
    std::fs::write(dir.join("vis.tsv"), VISUALIZATION).unwrap();
    std::fs::write(dir.join("sim.tsv"), SIMULATION).unwrap();

    let mut yaml = String::from(
        "format_version: 1\n\
         problems:\n\
         - measurement_files: [meas.tsv, meas_copy.tsv]\n\
         \x20 condition_files: [cond.tsv]\n\
         \x20 observable_files: [obs.tsv]\n",
    );
    if with_visualization {
        yaml.push_str("  visualization_files: [vis.tsv]\n");
    }
    let path = dir.join("problem.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

fn coordinator() -> (Coordinator, Receiver<CoordinatorEvent>) {
    let (tx, rx) = mpsc::channel();
    let mut coordinator = Coordinator::new();
    coordinator.add_plot_sink(Box::new(EventChannel::new(tx.clone())));
    coordinator.add_presenter_sink(Box::new(EventChannel::new(tx)));
    (coordinator, rx)
}

fn drain(rx: &Receiver<CoordinatorEvent>) -> Vec<CoordinatorEvent> {
    rx.try_iter().collect()
}

fn refresh_count(events: &[CoordinatorEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CoordinatorEvent::RefreshPlots(_)))
        .count()
}

#[test]
fn open_manifest_installs_first_files() {
    let path = fixture("open", true);
    let (mut coordinator, rx) = coordinator();

    let outcome = coordinator.open_manifest(&path).unwrap();
    assert!(outcome.warnings.is_empty());
    assert!(coordinator.warnings().is_empty());

    let selection = coordinator.selection();
    assert_eq!(
        selection.state(),
        SelectionState::Ready {
            visualization: true,
            simulation: false
        }
    );
    assert!(selection.is_active(&TableKey::new(TableCategory::Measurement, "meas.tsv")));
    assert!(selection.is_active(&TableKey::new(TableCategory::Condition, "cond.tsv")));

    let events = drain(&rx);
    assert_eq!(refresh_count(&events), 1);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, CoordinatorEvent::CorrelationVisible(false)))
    );
}

#[test]
fn missing_visualization_warns_and_plots_default() {
    let path = fixture("no_vis", false);
    let (mut coordinator, _rx) = coordinator();

    let outcome = coordinator.open_manifest(&path).unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].0, NO_VISUALIZATION_WARNING);
    assert_eq!(coordinator.warnings().text(), NO_VISUALIZATION_WARNING);
    assert_eq!(
        coordinator.selection().state(),
        SelectionState::MeasurementAndConditionReady
    );

    let plots = build_plots(coordinator.selection());
    assert_eq!(plots.figures.len(), 1);
    assert_eq!(plots.figures[0].title, "default plot");
    let labels: Vec<_> = plots.figures[0].series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["d1", "d2"]);
}

#[test]
fn registry_leaves_are_lazy() {
    let path = fixture("leaves", true);
    let (mut coordinator, _rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();

    let leaves: Vec<_> = coordinator.browse_registry().collect();
    assert_eq!(leaves.len(), 5);
    let observable = leaves
        .iter()
        .find(|l| l.key.category == TableCategory::Observable)
        .unwrap();
    assert!(!observable.loaded);
    let copy = leaves
        .iter()
        .find(|l| l.key.filename == "meas_copy.tsv")
        .unwrap();
    assert!(!copy.loaded);
}

#[test]
fn activate_twice_refreshes_twice() {
    let path = fixture("activate_twice", true);
    let (mut coordinator, rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    drain(&rx);

    coordinator
        .activate(TableCategory::Measurement, "meas_copy.tsv")
        .unwrap();
    let first = coordinator.selection().clone();
    coordinator
        .activate(TableCategory::Measurement, "meas_copy.tsv")
        .unwrap();

    assert_eq!(coordinator.selection(), &first);
    assert_eq!(refresh_count(&drain(&rx)), 2);
}

#[test]
fn inspect_returns_installed_table() {
    let path = fixture("inspect", true);
    let (mut coordinator, rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    coordinator
        .activate(TableCategory::Measurement, "meas_copy.tsv")
        .unwrap();
    drain(&rx);

    let inspected = coordinator
        .inspect(TableCategory::Measurement, "meas_copy.tsv")
        .unwrap();
    let installed = coordinator.selection().measurement().unwrap();
    assert!(Arc::ptr_eq(&inspected, installed));
    assert!(drain(&rx).is_empty());
}

#[test]
fn activate_rejects_non_plotting_category() {
    let path = fixture("activate_obs", true);
    let (mut coordinator, _rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    let before = coordinator.selection().clone();

    let err = coordinator
        .activate(TableCategory::Observable, "obs.tsv")
        .unwrap_err();
    assert!(matches!(err, AppError::Precondition(_)));
    assert_eq!(coordinator.selection(), &before);
    assert!(!coordinator.warnings().is_empty());
}

#[test]
fn open_table_view_emits_show_table() {
    let path = fixture("table_view", true);
    let (mut coordinator, rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    drain(&rx);

    coordinator
        .open_table_view(TableCategory::Observable, "obs.tsv")
        .unwrap();
    let events = drain(&rx);
    assert_eq!(events.len(), 1);
    match &events[0] {
        CoordinatorEvent::ShowTable { key, table } => {
            assert_eq!(key, &TableKey::new(TableCategory::Observable, "obs.tsv"));
            assert_eq!(table.row_count(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn attach_without_manifest_is_precondition() {
    let path = fixture("precondition", true);
    let (mut coordinator, rx) = coordinator();

    let err = coordinator
        .attach_simulation(&path.with_file_name("sim.tsv"))
        .unwrap_err();
    assert!(matches!(err, AppError::Precondition(ref m) if m == OPEN_MANIFEST_FIRST));
    assert_eq!(coordinator.selection().state(), SelectionState::Empty);
    assert_eq!(coordinator.warnings().text(), OPEN_MANIFEST_FIRST);
    assert!(drain(&rx).is_empty());

    coordinator.open_manifest(&path).unwrap();
    assert!(coordinator.warnings().is_empty());
}

#[test]
fn attach_reconciles_and_shows_correlation() {
    let path = fixture("attach", true);
    let (mut coordinator, rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    drain(&rx);

    let outcome = coordinator
        .attach_simulation(&path.with_file_name("sim.tsv"))
        .unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].0.contains("c9"));

    let simulation = coordinator.selection().simulation().unwrap();
    assert!(simulation.has_column("datasetId"));
    assert!(!simulation.has_column("measurement"));

    let events = drain(&rx);
    assert_eq!(refresh_count(&events), 1);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, CoordinatorEvent::CorrelationVisible(true)))
    );

    let sim_path = path.with_file_name("sim.tsv");
    let attached_key = TableKey::new(TableCategory::Simulation, sim_path.display().to_string());
    assert_eq!(
        coordinator.registry().unwrap().attached(),
        Some(&attached_key)
    );
    let leaves: Vec<_> = coordinator.browse_registry().collect();
    assert!(
        leaves
            .iter()
            .any(|l| l.key == attached_key && l.loaded && l.attached)
    );

    let points = correlation_points(coordinator.selection());
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].measured, 1.0);
    assert_eq!(points[0].simulated, 1.5);
}

#[test]
fn failed_open_keeps_previous_selection() {
    let path = fixture("failed_open", true);
    let (mut coordinator, _rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    let before = coordinator.selection().clone();

    let broken = path.with_file_name("broken.yaml");
    std::fs::write(&broken, "problems:\n- measurement_files: [meas.tsv]\n").unwrap();
    let err = coordinator.open_manifest(&broken).unwrap_err();
    assert!(matches!(err, AppError::Parse { .. }));
    assert_eq!(coordinator.selection(), &before);
    assert!(!coordinator.warnings().is_empty());

    let missing = coordinator.open_manifest(Path::new("/nonexistent/problem.yaml"));
    assert!(missing.is_err());
    assert_eq!(coordinator.selection(), &before);
}

#[test]
fn plots_follow_visualization_rows() {
    let path = fixture("plots", true);
    let (mut coordinator, _rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();

    let plots = build_plots(coordinator.selection());
    let titles: Vec<_> = plots.figures.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    let first = &plots.figures[0];
    assert_eq!(first.series.len(), 1);
    assert_eq!(first.series[0].label, "A");
    assert_eq!(first.series[0].points, vec![[0.0, 1.0], [1.0, 2.0]]);
}

#[test]
fn attached_simulation_keeps_manifest_file_of_same_name() {
    let path = fixture("attach_same_name", true);
    let dir = path.parent().unwrap().to_path_buf();
    std::fs::write(
        dir.join("sim.tsv"),
        "observableId\tsimulationConditionId\tsimulation\ttime\nobs_a\tc0\t1.5\t0\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("other")).unwrap();
    let other = dir.join("other").join("sim.tsv");
    std::fs::write(
        &other,
        "observableId\tsimulationConditionId\tsimulation\ttime\n\
         obs_a\tc0\t1.5\t0\n\
         obs_a\tc0\t2.5\t1\n",
    )
    .unwrap();
    let mut yaml = std::fs::read_to_string(&path).unwrap();
    yaml.push_str("  simulation_files: [sim.tsv]\n");
    std::fs::write(&path, yaml).unwrap();

    let (mut coordinator, _rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    let listed = coordinator
        .inspect(TableCategory::Simulation, "sim.tsv")
        .unwrap();
    assert_eq!(listed.row_count(), 1);

    coordinator.attach_simulation(&other).unwrap();
    let listed_again = coordinator
        .inspect(TableCategory::Simulation, "sim.tsv")
        .unwrap();
    assert!(Arc::ptr_eq(&listed, &listed_again));
    assert_eq!(coordinator.selection().simulation().unwrap().row_count(), 2);

    let simulation_leaves: Vec<_> = coordinator
        .browse_registry()
        .filter(|l| l.key.category == TableCategory::Simulation)
        .collect();
    assert_eq!(simulation_leaves.len(), 2);
    assert!(!simulation_leaves[0].attached);
    assert!(simulation_leaves[1].attached);

    let attached = coordinator
        .inspect(TableCategory::Simulation, &simulation_leaves[1].key.filename)
        .unwrap();
    assert_eq!(attached.row_count(), 2);
}

#[test]
fn failed_activate_keeps_previous_selection() {
    let path = fixture("failed_activate", true);
    let dir = path.parent().unwrap().to_path_buf();
    std::fs::write(dir.join("bad.tsv"), "observableId\ttime\nobs_a\t0\n").unwrap();
    let mut yaml = std::fs::read_to_string(&path).unwrap();
    yaml = yaml.replace("[meas.tsv, meas_copy.tsv]", "[meas.tsv, meas_copy.tsv, bad.tsv, gone.tsv]");
    std::fs::write(&path, yaml).unwrap();

    let (mut coordinator, rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();
    let before = coordinator.selection().clone();
    drain(&rx);

    for filename in ["bad.tsv", "gone.tsv"] {
        let err = coordinator
            .activate(TableCategory::Measurement, filename)
            .unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }), "{filename}: {err}");
        assert_eq!(coordinator.selection(), &before);
        assert!(!coordinator.warnings().is_empty());
    }
    assert!(
        coordinator
            .warnings()
            .text()
            .contains(&std::fs::read_to_string(dir.join("gone.tsv")).unwrap_err().to_string())
    );
    assert_eq!(refresh_count(&drain(&rx)), 0);
}

#[test]
fn successful_inspect_clears_warning_area() {
    let path = fixture("inspect_clears", true);
    let (mut coordinator, _rx) = coordinator();
    coordinator.open_manifest(&path).unwrap();

    coordinator
        .activate(TableCategory::Observable, "obs.tsv")
        .unwrap_err();
    assert!(!coordinator.warnings().is_empty());

    coordinator
        .inspect(TableCategory::Observable, "obs.tsv")
        .unwrap();
    assert!(coordinator.warnings().is_empty());
}
