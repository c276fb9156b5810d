//! Outbound event-handler interfaces of the coordinator.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use pv_table::LoadedTable;

use crate::registry::TableKey;
use crate::selection::ActiveSelection;

/// Consumer of the active selection; called after every successful change.
pub trait PlotSink {
    fn refresh_plots(&mut self, selection: &ActiveSelection);
}

/// Table views and optional panels of the presentation layer.
pub trait PresenterSink {
    /// Opens a new, independent read-only view.
    fn show_table(&mut self, key: &TableKey, table: Arc<LoadedTable>);

    /// Shows or hides the measurement/simulation correlation view.
    fn set_correlation_visible(&mut self, visible: bool);
}

/// Event forwarded by [`EventChannel`].
#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    RefreshPlots(ActiveSelection),
    ShowTable {
        key: TableKey,
        table: Arc<LoadedTable>,
    },
    CorrelationVisible(bool),
}

/// Forwards coordinator events over a channel so a frontend can drain them
/// on its own schedule.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: Sender<CoordinatorEvent>,
}

impl EventChannel {
    pub fn new(tx: Sender<CoordinatorEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: CoordinatorEvent) {
        // receiver gone means the frontend is shutting down
        let _ = self.tx.send(event);
    }
}

impl PlotSink for EventChannel {
    fn refresh_plots(&mut self, selection: &ActiveSelection) {
        self.send(CoordinatorEvent::RefreshPlots(selection.clone()));
    }
}

impl PresenterSink for EventChannel {
    fn show_table(&mut self, key: &TableKey, table: Arc<LoadedTable>) {
        self.send(CoordinatorEvent::ShowTable {
            key: key.clone(),
            table,
        });
    }

    fn set_correlation_visible(&mut self, visible: bool) {
        self.send(CoordinatorEvent::CorrelationVisible(visible));
    }
}
