//! Column schemas per table category.

use pv_core::TableCategory;
use pv_core::columns::*;

use crate::table::LoadedTable;
use crate::{TableError, TableResult};

/// Required and optional columns of one table category.
///
/// Closed schemas reject any column they do not name. Condition tables are
/// open: every extra column is a model parameter id.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub category: TableCategory,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub open: bool,
}

const MEASUREMENT_OPTIONAL: &[&str] = &[
    PREEQUILIBRATION_CONDITION_ID,
    OBSERVABLE_PARAMETERS,
    NOISE_PARAMETERS,
    DATASET_ID,
    REPLICATE_ID,
];

pub fn schema_for(category: TableCategory) -> TableSchema {
    match category {
        TableCategory::Measurement => TableSchema {
            category,
            required: &[OBSERVABLE_ID, SIMULATION_CONDITION_ID, MEASUREMENT, TIME],
            optional: MEASUREMENT_OPTIONAL,
            open: false,
        },
        TableCategory::Simulation => TableSchema {
            category,
            required: &[OBSERVABLE_ID, SIMULATION_CONDITION_ID, SIMULATION, TIME],
            optional: MEASUREMENT_OPTIONAL,
            open: false,
        },
        TableCategory::Condition => TableSchema {
            category,
            required: &[CONDITION_ID],
            optional: &[CONDITION_NAME],
            open: true,
        },
        TableCategory::Observable => TableSchema {
            category,
            required: &[OBSERVABLE_ID, OBSERVABLE_FORMULA, NOISE_FORMULA],
            optional: &[OBSERVABLE_NAME, OBSERVABLE_TRANSFORMATION, NOISE_DISTRIBUTION],
            open: false,
        },
        TableCategory::Visualization => TableSchema {
            category,
            required: &[PLOT_ID],
            optional: &[
                PLOT_NAME,
                PLOT_TYPE_SIMULATION,
                PLOT_TYPE_DATA,
                DATASET_ID,
                X_VALUES,
                X_OFFSET,
                X_LABEL,
                X_SCALE,
                Y_VALUES,
                Y_OFFSET,
                Y_LABEL,
                Y_SCALE,
                LEGEND_ENTRY,
            ],
            open: false,
        },
    }
}

impl TableSchema {
    pub fn allows(&self, column: &str) -> bool {
        self.open || self.required.contains(&column) || self.optional.contains(&column)
    }

    pub fn check(&self, table: &LoadedTable) -> TableResult<()> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TableError::MissingColumns {
                category: self.category,
                columns: missing,
            });
        }

        let unexpected: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| !self.allows(c))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(TableError::UnexpectedColumns {
                category: self.category,
                columns: unexpected,
            });
        }

        Ok(())
    }
}
