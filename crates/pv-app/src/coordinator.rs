//! Manifest registry and active-selection coordination.
//!
//! Every public operation is a boundary: failures are returned *and* written
//! to the warning area, and the selection only changes when the whole action
//! succeeds.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use pv_core::TableCategory;
use pv_core::columns::{CONDITION_ID, SIMULATION_CONDITION_ID};
use pv_manifest::load_manifest;
use pv_table::{LoadedTable, load_table, reconcile_simulation};
use tracing::{info, warn};

use crate::error::{AppError, AppResult, UserWarning};
use crate::events::{PlotSink, PresenterSink};
use crate::plot_model;
use crate::registry::{RegistryLeaf, TableKey, TableRegistry};
use crate::selection::{ActiveSelection, ActiveTable};

pub const NO_VISUALIZATION_WARNING: &str =
    "The YAML file contains no visualization file (default plotted)";
pub const OPEN_MANIFEST_FIRST: &str = "Please open a YAML file first.";

/// What a successful action reports besides its side effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub warnings: Vec<UserWarning>,
}

/// Persistent user-visible messages, replaced by each finished action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningArea {
    messages: Vec<String>,
}

impl WarningArea {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn text(&self) -> String {
        self.messages.join("\n")
    }

    fn replace(&mut self, messages: impl IntoIterator<Item = String>) {
        self.messages = messages.into_iter().collect();
    }
}

#[derive(Default)]
pub struct Coordinator {
    registry: Option<TableRegistry>,
    selection: ActiveSelection,
    warnings: WarningArea,
    plot_sinks: Vec<Box<dyn PlotSink>>,
    presenter_sinks: Vec<Box<dyn PresenterSink>>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_plot_sink(&mut self, sink: Box<dyn PlotSink>) {
        self.plot_sinks.push(sink);
    }

    pub fn add_presenter_sink(&mut self, sink: Box<dyn PresenterSink>) {
        self.presenter_sinks.push(sink);
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn warnings(&self) -> &WarningArea {
        &self.warnings
    }

    pub fn registry(&self) -> Option<&TableRegistry> {
        self.registry.as_ref()
    }

    /// Parses a manifest and installs the first measurement, condition and
    /// (if listed) visualization file. Any attached simulation is dropped.
    pub fn open_manifest(&mut self, path: &Path) -> AppResult<Outcome> {
        let result = self.try_open_manifest(path);
        self.finish(result)
    }

    fn try_open_manifest(&mut self, path: &Path) -> AppResult<Outcome> {
        let manifest = load_manifest(path).map_err(|e| AppError::parse(path, e))?;
        let mut registry = TableRegistry::new(manifest);
        let mut staged = ActiveSelection::default();
        let mut outcome = Outcome::default();

        for category in [TableCategory::Measurement, TableCategory::Condition] {
            let filename = registry
                .manifest()
                .first_file(category)
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::parse(path, format!("no {} file listed", category.manifest_key()))
                })?;
            staged.install(load_active(&mut registry, category, filename)?);
        }

        match registry
            .manifest()
            .first_file(TableCategory::Visualization)
            .map(str::to_string)
        {
            Some(filename) => staged.install(load_active(
                &mut registry,
                TableCategory::Visualization,
                filename,
            )?),
            None => outcome
                .warnings
                .push(UserWarning::new(NO_VISUALIZATION_WARNING)),
        }

        info!(path = %path.display(), "active selection replaced");
        self.registry = Some(registry);
        self.selection = staged;
        self.refresh_plots(&mut outcome);
        for sink in &mut self.presenter_sinks {
            sink.set_correlation_visible(false);
        }
        Ok(outcome)
    }

    /// Registry leaves for the tree view. Tables are not loaded here.
    pub fn browse_registry(&self) -> impl Iterator<Item = RegistryLeaf> + '_ {
        self.registry.iter().flat_map(|r| r.leaves())
    }

    /// Installs the table as the active one of its category and replots.
    ///
    /// Only measurement, condition and visualization tables feed the plots.
    /// Every successful call replots, even if the table was already active.
    pub fn activate(&mut self, category: TableCategory, filename: &str) -> AppResult<Outcome> {
        let result = self.try_activate(category, filename);
        self.finish(result)
    }

    fn try_activate(&mut self, category: TableCategory, filename: &str) -> AppResult<Outcome> {
        if !category.is_plotting_slot() {
            return Err(AppError::precondition(format!(
                "{} tables do not feed the plots; open them with a double click",
                category
            )));
        }
        let registry = self
            .registry
            .as_mut()
            .ok_or_else(|| AppError::precondition(OPEN_MANIFEST_FIRST))?;

        let active = load_active(registry, category, filename.to_string())?;
        self.selection.install(active);

        let mut outcome = Outcome::default();
        self.refresh_plots(&mut outcome);
        Ok(outcome)
    }

    /// Loads (or fetches) a table for read-only display.
    ///
    /// The selection is left alone and nothing is replotted. Like every
    /// other action it replaces the warning area.
    pub fn inspect(&mut self, category: TableCategory, filename: &str) -> AppResult<Arc<LoadedTable>> {
        let key = TableKey::new(category, filename);
        let result = match self.registry.as_mut() {
            Some(registry) => registry.get_or_load(&key),
            None => Err(AppError::precondition(OPEN_MANIFEST_FIRST)),
        };
        match &result {
            Ok(_) => self.warnings.replace(Vec::new()),
            Err(e) => {
                warn!(%key, error = %e, "inspect failed");
                self.warnings.replace([e.to_string()]);
            }
        }
        result
    }

    /// Double-click: inspect and open an independent table view.
    pub fn open_table_view(&mut self, category: TableCategory, filename: &str) -> AppResult<()> {
        let table = self.inspect(category, filename)?;
        let key = TableKey::new(category, filename);
        for sink in &mut self.presenter_sinks {
            sink.show_table(&key, Arc::clone(&table));
        }
        Ok(())
    }

    /// Loads a simulation file, aligns its columns with the active
    /// measurement table and installs it.
    pub fn attach_simulation(&mut self, path: &Path) -> AppResult<Outcome> {
        let result = self.try_attach_simulation(path);
        self.finish(result)
    }

    fn try_attach_simulation(&mut self, path: &Path) -> AppResult<Outcome> {
        let measurement = self
            .selection
            .measurement()
            .cloned()
            .ok_or_else(|| AppError::precondition(OPEN_MANIFEST_FIRST))?;
        let registry = self
            .registry
            .as_mut()
            .ok_or_else(|| AppError::precondition(OPEN_MANIFEST_FIRST))?;

        let table =
            load_table(path, TableCategory::Simulation).map_err(|e| AppError::parse(path, e))?;
        let reconciled =
            reconcile_simulation(table, &measurement).map_err(|e| AppError::parse(path, e))?;

        let mut outcome = Outcome::default();
        if let Some(conditions) = self.selection.condition() {
            outcome
                .warnings
                .extend(unknown_conditions(&reconciled.table, conditions));
        }

        let key = TableKey::new(TableCategory::Simulation, path.display().to_string());
        let table = Arc::new(reconciled.table);
        registry.attach(key.clone(), Arc::clone(&table));
        self.selection.install(ActiveTable { key, table });

        info!(
            path = %path.display(),
            added = ?reconciled.added,
            dropped = ?reconciled.dropped,
            "simulation attached"
        );
        self.refresh_plots(&mut outcome);
        for sink in &mut self.presenter_sinks {
            sink.set_correlation_visible(true);
        }
        Ok(outcome)
    }

    fn refresh_plots(&mut self, outcome: &mut Outcome) {
        outcome
            .warnings
            .extend(plot_model::selection_warnings(&self.selection));
        for sink in &mut self.plot_sinks {
            sink.refresh_plots(&self.selection);
        }
    }

    fn finish(&mut self, result: AppResult<Outcome>) -> AppResult<Outcome> {
        match &result {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    warn!(%warning, "user warning");
                }
                self.warnings
                    .replace(outcome.warnings.iter().map(ToString::to_string));
            }
            Err(e) => {
                warn!(error = %e, "action failed");
                self.warnings.replace([e.to_string()]);
            }
        }
        result
    }
}

fn load_active(
    registry: &mut TableRegistry,
    category: TableCategory,
    filename: String,
) -> AppResult<ActiveTable> {
    let key = TableKey::new(category, filename);
    let table = registry.get_or_load(&key)?;
    Ok(ActiveTable { key, table })
}

/// Simulation conditions the active condition table does not define.
fn unknown_conditions(simulation: &LoadedTable, conditions: &LoadedTable) -> Vec<UserWarning> {
    let known: HashSet<String> = conditions
        .column(CONDITION_ID)
        .into_iter()
        .flatten()
        .filter_map(|c| c.as_text())
        .collect();

    let mut missing: Vec<String> = simulation
        .column(SIMULATION_CONDITION_ID)
        .into_iter()
        .flatten()
        .filter_map(|c| c.as_text())
        .filter(|id| !known.contains(id))
        .collect();
    missing.sort();
    missing.dedup();

    if missing.is_empty() {
        Vec::new()
    } else {
        vec![UserWarning::new(format!(
            "Simulation uses conditions missing from the condition table: {}",
            missing.join(", ")
        ))]
    }
}
