//! pv-table: loaded PEtab tables and their presentation.

pub mod cell;
pub mod loader;
pub mod presenter;
pub mod reconcile;
pub mod records;
pub mod schema;
pub mod table;

pub use cell::CellValue;
pub use loader::{load_table, parse_table, read_table};
pub use presenter::{Axis, RowFilter, SortFilterProxy, SortOrder, TablePresenter};
pub use reconcile::{Reconciliation, reconcile_simulation};
pub use records::{DataPoint, data_points};
pub use schema::{TableSchema, schema_for};
pub use table::LoadedTable;

use pv_core::TableCategory;
use std::path::PathBuf;

pub type TableResult<T> = Result<T, TableError>;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("Failed to read table file: {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table has no header row")]
    NoHeader,

    #[error("Duplicate column: {name}")]
    DuplicateColumn { name: String },

    #[error("Row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{category} table is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        category: TableCategory,
        columns: Vec<String>,
    },

    #[error("{category} table has unexpected columns: {}", columns.join(", "))]
    UnexpectedColumns {
        category: TableCategory,
        columns: Vec<String>,
    },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Non-numeric value in column '{column}' at row {row}: {value}")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
}
