//! The set of tables currently feeding the plots.

use std::collections::BTreeMap;
use std::sync::Arc;

use pv_core::TableCategory;
use pv_table::LoadedTable;

use crate::registry::TableKey;

/// A table installed in a selection slot, with the registry key it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTable {
    pub key: TableKey,
    pub table: Arc<LoadedTable>,
}

/// Validity of the selection for a plotting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    MeasurementAndConditionReady,
    Ready { visualization: bool, simulation: bool },
}

/// At most one table per category.
///
/// Only the coordinator mutates a selection; everybody else sees cheap
/// clones whose tables are shared and never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSelection {
    slots: BTreeMap<TableCategory, ActiveTable>,
}

impl ActiveSelection {
    pub fn get(&self, category: TableCategory) -> Option<&ActiveTable> {
        self.slots.get(&category)
    }

    pub fn table(&self, category: TableCategory) -> Option<&Arc<LoadedTable>> {
        self.get(category).map(|a| &a.table)
    }

    pub fn measurement(&self) -> Option<&Arc<LoadedTable>> {
        self.table(TableCategory::Measurement)
    }

    pub fn condition(&self) -> Option<&Arc<LoadedTable>> {
        self.table(TableCategory::Condition)
    }

    pub fn visualization(&self) -> Option<&Arc<LoadedTable>> {
        self.table(TableCategory::Visualization)
    }

    pub fn simulation(&self) -> Option<&Arc<LoadedTable>> {
        self.table(TableCategory::Simulation)
    }

    pub fn is_active(&self, key: &TableKey) -> bool {
        self.get(key.category).is_some_and(|a| &a.key == key)
    }

    pub fn state(&self) -> SelectionState {
        if self.measurement().is_none() || self.condition().is_none() {
            return SelectionState::Empty;
        }
        let visualization = self.visualization().is_some();
        let simulation = self.simulation().is_some();
        if visualization || simulation {
            SelectionState::Ready {
                visualization,
                simulation,
            }
        } else {
            SelectionState::MeasurementAndConditionReady
        }
    }

    /// Measurement and condition are both present.
    pub fn is_plottable(&self) -> bool {
        self.state() != SelectionState::Empty
    }

    pub(crate) fn install(&mut self, active: ActiveTable) {
        self.slots.insert(active.key.category, active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_table::parse_table;

    fn active(category: TableCategory, name: &str) -> ActiveTable {
        ActiveTable {
            key: TableKey::new(category, name),
            table: Arc::new(parse_table("a\n1\n", b'\t').unwrap()),
        }
    }

    #[test]
    fn state_follows_slots() {
        let mut selection = ActiveSelection::default();
        assert_eq!(selection.state(), SelectionState::Empty);

        selection.install(active(TableCategory::Measurement, "m.tsv"));
        assert_eq!(selection.state(), SelectionState::Empty);

        selection.install(active(TableCategory::Condition, "c.tsv"));
        assert_eq!(selection.state(), SelectionState::MeasurementAndConditionReady);

        selection.install(active(TableCategory::Simulation, "s.tsv"));
        assert_eq!(
            selection.state(),
            SelectionState::Ready {
                visualization: false,
                simulation: true
            }
        );
    }

    #[test]
    fn install_replaces_slot() {
        let mut selection = ActiveSelection::default();
        selection.install(active(TableCategory::Measurement, "m1.tsv"));
        selection.install(active(TableCategory::Measurement, "m2.tsv"));
        assert!(selection.is_active(&TableKey::new(TableCategory::Measurement, "m2.tsv")));
        assert!(!selection.is_active(&TableKey::new(TableCategory::Measurement, "m1.tsv")));
    }
}
