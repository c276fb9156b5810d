//! Immutable rectangular tables.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cell::CellValue;
use crate::{TableError, TableResult};

/// A rectangular, labeled dataset loaded from one file.
///
/// Once a table is shared it is never changed; the consuming helpers below
/// are only used while a table is still being assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    source: Option<PathBuf>,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl LoadedTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> TableResult<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateColumn { name: name.clone() });
            }
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::Ragged {
                    row: index,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        Ok(Self {
            source: None,
            columns,
            rows,
        })
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[index]))
    }

    /// Removes a column if present.
    pub fn without_column(mut self, name: &str) -> Self {
        if let Some(index) = self.column_index(name) {
            self.columns.remove(index);
            for row in &mut self.rows {
                row.remove(index);
            }
        }
        self
    }

    /// Appends a column; `values` must have one entry per row.
    pub fn push_column(mut self, name: &str, values: Vec<CellValue>) -> TableResult<Self> {
        if self.has_column(name) {
            return Err(TableError::DuplicateColumn {
                name: name.to_string(),
            });
        }
        if values.len() != self.rows.len() {
            return Err(TableError::Ragged {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LoadedTable {
        LoadedTable::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Int(1), CellValue::Text("x".into())],
                vec![CellValue::Int(2), CellValue::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = LoadedTable::new(vec!["a".into(), "a".into()], vec![]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = LoadedTable::new(vec!["a".into()], vec![vec![]]).unwrap_err();
        assert!(matches!(err, TableError::Ragged { row: 0, .. }));
    }

    #[test]
    fn drop_and_push_columns() {
        let table = sample()
            .without_column("a")
            .push_column("c", vec![CellValue::Float(0.5), CellValue::Float(1.5)])
            .unwrap();
        assert_eq!(table.columns(), ["b", "c"]);
        assert_eq!(table.cell(1, 1), Some(&CellValue::Float(1.5)));
        assert!(table.clone().push_column("c", vec![]).is_err());
    }

    #[test]
    fn column_iteration() {
        let table = sample();
        let values: Vec<_> = table.column("a").unwrap().cloned().collect();
        assert_eq!(values, vec![CellValue::Int(1), CellValue::Int(2)]);
        assert!(table.column("zzz").is_none());
    }
}
