//! Column alignment of simulation tables against the active measurement table.

use pv_core::columns::*;
use tracing::debug;

use crate::TableResult;
use crate::cell::CellValue;
use crate::table::LoadedTable;

/// Result of aligning a simulation table with a measurement table.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub table: LoadedTable,
    /// Columns synthesized with default values, in measurement order.
    pub added: Vec<String>,
    pub dropped: Vec<String>,
}

/// Aligns `simulation` with the column set of `measurement`.
///
/// Every measurement column the simulation lacks is appended with default
/// values, except the measured value column itself, which the simulation
/// table carries as `simulation`. A `replicateId` column the measurement
/// table does not have is removed, since replicate splitting keys off it.
pub fn reconcile_simulation(
    simulation: LoadedTable,
    measurement: &LoadedTable,
) -> TableResult<Reconciliation> {
    let mut table = simulation;
    let mut dropped = Vec::new();

    if table.has_column(REPLICATE_ID) && !measurement.has_column(REPLICATE_ID) {
        table = table.without_column(REPLICATE_ID);
        dropped.push(REPLICATE_ID.to_string());
    }

    let mut added = Vec::new();
    for column in measurement.columns() {
        if column == MEASUREMENT || table.has_column(column) {
            continue;
        }
        let values = default_column(column, &table);
        table = table.push_column(column, values)?;
        added.push(column.clone());
    }

    debug!(?added, ?dropped, "reconciled simulation columns");
    Ok(Reconciliation {
        table,
        added,
        dropped,
    })
}

/// Default cells for a column synthesized into `table`.
pub fn default_column(column: &str, table: &LoadedTable) -> Vec<CellValue> {
    let rows = table.row_count();
    match column {
        PREEQUILIBRATION_CONDITION_ID | OBSERVABLE_PARAMETERS | REPLICATE_ID => {
            vec![CellValue::Text(String::new()); rows]
        }
        NOISE_PARAMETERS => vec![CellValue::Int(0); rows],
        DATASET_ID => {
            let observable = table.column_index(OBSERVABLE_ID);
            let condition = table.column_index(SIMULATION_CONDITION_ID);
            table
                .rows()
                .map(|row| match (observable, condition) {
                    (Some(o), Some(c)) => match (row[o].as_text(), row[c].as_text()) {
                        (Some(o), Some(c)) => CellValue::Text(format!("{o}_{c}")),
                        _ => CellValue::Missing,
                    },
                    _ => CellValue::Missing,
                })
                .collect()
        }
        _ => vec![CellValue::Missing; rows],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_table;

    #[test]
    fn generic_columns_follow_measurement() {
        let measurement = parse_table("A\tB\tC\n1\t2\t3\n", b'\t').unwrap();
        let simulation = parse_table("A\tB\treplicateId\n1\t2\tr1\n", b'\t').unwrap();

        let result = reconcile_simulation(simulation, &measurement).unwrap();
        assert_eq!(result.table.columns(), ["A", "B", "C"]);
        assert_eq!(result.added, vec!["C"]);
        assert_eq!(result.dropped, vec!["replicateId"]);
        assert_eq!(result.table.cell(0, 2), Some(&CellValue::Missing));
    }

    #[test]
    fn replicate_column_kept_when_measurement_has_it() {
        let measurement = parse_table("A\treplicateId\n1\tr1\n", b'\t').unwrap();
        let simulation = parse_table("A\treplicateId\n1\tr1\n", b'\t').unwrap();
        let result = reconcile_simulation(simulation, &measurement).unwrap();
        assert!(result.dropped.is_empty());
        assert!(result.table.has_column("replicateId"));
    }

    #[test]
    fn petab_defaults() {
        let measurement = parse_table(
            "observableId\tsimulationConditionId\tmeasurement\ttime\tnoiseParameters\tdatasetId\n\
             obs\tc0\t1.0\t0\t1\td1\n",
            b'\t',
        )
        .unwrap();
        let simulation = parse_table(
            "observableId\tsimulationConditionId\tsimulation\ttime\nobs\tc0\t0.9\t0\n",
            b'\t',
        )
        .unwrap();

        let result = reconcile_simulation(simulation, &measurement).unwrap();
        assert_eq!(result.added, vec!["noiseParameters", "datasetId"]);
        assert!(!result.table.has_column("measurement"));
        let dataset = result.table.column_index("datasetId").unwrap();
        assert_eq!(
            result.table.cell(0, dataset),
            Some(&CellValue::Text("obs_c0".into()))
        );
        let noise = result.table.column_index("noiseParameters").unwrap();
        assert_eq!(result.table.cell(0, noise), Some(&CellValue::Int(0)));
    }
}
