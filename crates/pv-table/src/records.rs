//! Typed views over measurement and simulation tables.

use pv_core::columns::*;

use crate::table::LoadedTable;
use crate::{TableError, TableResult};

/// One plottable row of a measurement or simulation table.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub row: usize,
    pub observable_id: String,
    pub condition_id: String,
    pub dataset_id: Option<String>,
    pub x: f64,
    pub value: f64,
}

fn require(table: &LoadedTable, name: &str) -> TableResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| TableError::ColumnNotFound {
            name: name.to_string(),
        })
}

/// Extracts `(x, value)` points, skipping rows where either is missing.
///
/// `x_column` is usually `time`; `value_column` is `measurement` or
/// `simulation`.
pub fn data_points(
    table: &LoadedTable,
    x_column: &str,
    value_column: &str,
) -> TableResult<Vec<DataPoint>> {
    let observable = require(table, OBSERVABLE_ID)?;
    let condition = require(table, SIMULATION_CONDITION_ID)?;
    let x_index = require(table, x_column)?;
    let value_index = require(table, value_column)?;
    let dataset = table.column_index(DATASET_ID);

    let mut points = Vec::with_capacity(table.row_count());
    for (row, cells) in table.rows().enumerate() {
        let (x_cell, value_cell) = (&cells[x_index], &cells[value_index]);
        if x_cell.is_missing() || value_cell.is_missing() {
            continue;
        }
        let numeric = |column: &str, cell: &crate::CellValue| {
            cell.as_f64().ok_or_else(|| TableError::NotNumeric {
                column: column.to_string(),
                row,
                value: cell.to_string(),
            })
        };

        points.push(DataPoint {
            row,
            observable_id: cells[observable].as_text().unwrap_or_default(),
            condition_id: cells[condition].as_text().unwrap_or_default(),
            dataset_id: dataset.and_then(|i| cells[i].as_text()),
            x: numeric(x_column, x_cell)?,
            value: numeric(value_column, value_cell)?,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_table;

    #[test]
    fn skips_missing_and_reads_ids() {
        let table = parse_table(
            "observableId\tsimulationConditionId\tmeasurement\ttime\tdatasetId\n\
             obs_a\tc0\t1.5\t0\td1\n\
             obs_a\tc0\tNaN\t1\td1\n\
             obs_b\tc1\t2.5\t2\t\n",
            b'\t',
        )
        .unwrap();

        let points = data_points(&table, TIME, MEASUREMENT).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].dataset_id.as_deref(), Some("d1"));
        assert_eq!(points[1].row, 2);
        assert_eq!(points[1].dataset_id, None);
        assert_eq!(points[1].x, 2.0);
    }

    #[test]
    fn text_x_values_are_an_error() {
        let table = parse_table(
            "observableId\tsimulationConditionId\tmeasurement\ttime\nobs\tc0\t1\tlate\n",
            b'\t',
        )
        .unwrap();
        assert!(matches!(
            data_points(&table, TIME, MEASUREMENT),
            Err(TableError::NotNumeric { row: 0, .. })
        ));
    }

    #[test]
    fn missing_value_column_reported() {
        let table = parse_table("observableId\tsimulationConditionId\ttime\nobs\tc0\t0\n", b'\t')
            .unwrap();
        assert!(matches!(
            data_points(&table, TIME, SIMULATION),
            Err(TableError::ColumnNotFound { .. })
        ));
    }
}
