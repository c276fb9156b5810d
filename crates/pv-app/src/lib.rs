//! pv-app: application services shared by the CLI and the GUI.
//!
//! The [`Coordinator`] owns the table registry and the active selection and
//! notifies registered sinks; [`plot_model`] turns a selection into figures.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod plot_model;
pub mod registry;
pub mod selection;
pub mod settings;

pub use coordinator::{
    Coordinator, NO_VISUALIZATION_WARNING, OPEN_MANIFEST_FIRST, Outcome, WarningArea,
};
pub use error::{AppError, AppResult, UserWarning};
pub use events::{CoordinatorEvent, EventChannel, PlotSink, PresenterSink};
pub use plot_model::{
    AxisScale, CorrelationPoint, PlotFigure, PlotSet, PlotSpec, Series, SeriesKind, build_plots,
    correlation_points,
};
pub use registry::{RegistryLeaf, TableKey, TableRegistry};
pub use selection::{ActiveSelection, ActiveTable, SelectionState};
pub use settings::{Settings, SettingsStore};
