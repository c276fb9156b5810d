//! Grid presentation of a loaded table.
//!
//! [`TablePresenter`] exposes the dimensions, header labels and display
//! strings a grid widget needs. [`SortFilterProxy`] sits on top of it and
//! reorders or hides visible rows without touching the table.

use core::cmp::Ordering;
use std::sync::Arc;

use pv_core::{PvError, PvResult};

use crate::cell::CellValue;
use crate::table::LoadedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    Descending,
    #[default]
    Unsorted,
}

impl SortOrder {
    /// Next state when the header of the already sorted column is clicked again.
    pub fn next(self) -> Self {
        match self {
            SortOrder::Unsorted => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Unsorted,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortOrder::Ascending => "⏶",
            SortOrder::Descending => "⏷",
            SortOrder::Unsorted => "",
        }
    }
}

/// Read-only grid model over a shared table.
#[derive(Debug, Clone)]
pub struct TablePresenter {
    table: Arc<LoadedTable>,
}

impl TablePresenter {
    pub fn new(table: Arc<LoadedTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Arc<LoadedTable> {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.table.column_count()
    }

    /// Column name for the column axis, stringified row index for the row axis.
    pub fn header_label(&self, index: usize, axis: Axis) -> Option<String> {
        match axis {
            Axis::Column => self.table.columns().get(index).cloned(),
            Axis::Row => (index < self.row_count()).then(|| index.to_string()),
        }
    }

    /// Display string of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of range.
    pub fn cell_value(&self, row: usize, column: usize) -> String {
        match self.try_cell_value(row, column) {
            Some(value) => value,
            None => panic!(
                "cell ({row}, {column}) out of range for {}x{} table",
                self.row_count(),
                self.column_count()
            ),
        }
    }

    pub fn try_cell_value(&self, row: usize, column: usize) -> Option<String> {
        self.table.cell(row, column).map(ToString::to_string)
    }
}

/// Case-insensitive substring filter over display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    /// Restrict matching to one column; `None` matches any column.
    pub column: Option<usize>,
    pub needle: String,
}

impl RowFilter {
    pub fn any_column(needle: impl Into<String>) -> Self {
        Self {
            column: None,
            needle: needle.into(),
        }
    }

    fn matches(&self, presenter: &TablePresenter, row: usize) -> bool {
        let needle = self.needle.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |column: usize| {
            presenter
                .try_cell_value(row, column)
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };
        match self.column {
            Some(column) => hit(column),
            None => (0..presenter.column_count()).any(hit),
        }
    }
}

/// Sort-and-filter adapter mapping visible rows to source rows.
#[derive(Debug, Clone)]
pub struct SortFilterProxy {
    source: TablePresenter,
    sort_column: Option<usize>,
    sort_order: SortOrder,
    filter: Option<RowFilter>,
    visible: Vec<usize>,
}

impl SortFilterProxy {
    pub fn new(source: TablePresenter) -> Self {
        let visible = (0..source.row_count()).collect();
        Self {
            source,
            sort_column: None,
            sort_order: SortOrder::Unsorted,
            filter: None,
            visible,
        }
    }

    pub fn source(&self) -> &TablePresenter {
        &self.source
    }

    pub fn sort_column(&self) -> Option<usize> {
        self.sort_column
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn filter(&self) -> Option<&RowFilter> {
        self.filter.as_ref()
    }

    pub fn set_sort(&mut self, column: usize, order: SortOrder) -> PvResult<()> {
        self.check_column(column)?;
        if order == SortOrder::Unsorted {
            self.sort_column = None;
        } else {
            self.sort_column = Some(column);
        }
        self.sort_order = order;
        self.rebuild();
        Ok(())
    }

    /// Header click: cycles the order on the sorted column, starts ascending
    /// on any other column.
    pub fn toggle_sort(&mut self, column: usize) -> PvResult<SortOrder> {
        let order = if self.sort_column == Some(column) {
            self.sort_order.next()
        } else {
            SortOrder::Ascending
        };
        self.set_sort(column, order)?;
        Ok(order)
    }

    pub fn set_filter(&mut self, filter: Option<RowFilter>) -> PvResult<()> {
        if let Some(column) = filter.as_ref().and_then(|f| f.column) {
            self.check_column(column)?;
        }
        self.filter = filter;
        self.rebuild();
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    pub fn column_count(&self) -> usize {
        self.source.column_count()
    }

    pub fn visible_rows(&self) -> &[usize] {
        &self.visible
    }

    pub fn map_to_source(&self, visible_row: usize) -> Option<usize> {
        self.visible.get(visible_row).copied()
    }

    /// Row labels follow the source row so they travel with sorting.
    pub fn header_label(&self, index: usize, axis: Axis) -> Option<String> {
        match axis {
            Axis::Column => self.source.header_label(index, Axis::Column),
            Axis::Row => self
                .map_to_source(index)
                .and_then(|row| self.source.header_label(row, Axis::Row)),
        }
    }

    /// # Panics
    ///
    /// Panics if `visible_row` or `column` is out of range.
    pub fn cell_value(&self, visible_row: usize, column: usize) -> String {
        let row = self.visible[visible_row];
        self.source.cell_value(row, column)
    }

    fn check_column(&self, column: usize) -> PvResult<()> {
        if column >= self.column_count() {
            return Err(PvError::IndexOob {
                what: "sort/filter column",
                index: column,
                len: self.column_count(),
            });
        }
        Ok(())
    }

    fn rebuild(&mut self) {
        let source = &self.source;
        let mut visible: Vec<usize> = match &self.filter {
            Some(filter) => (0..source.row_count())
                .filter(|&row| filter.matches(source, row))
                .collect(),
            None => (0..source.row_count()).collect(),
        };

        if let Some(column) = self.sort_column {
            let table = source.table();
            let descending = self.sort_order == SortOrder::Descending;
            visible.sort_by(|&a, &b| match (table.cell(a, column), table.cell(b, column)) {
                (Some(a), Some(b)) => compare_cells(a, b, descending),
                _ => Ordering::Equal,
            });
        }

        self.visible = visible;
    }
}

// Stable sort keeps source order for equal keys; missing cells go last either way.
fn compare_cells(a: &CellValue, b: &CellValue, descending: bool) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if descending => b.sort_cmp(a),
        (false, false) => a.sort_cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_table;

    fn proxy() -> SortFilterProxy {
        let table = parse_table("id\tvalue\nb\t2\na\t\nc\t1\nd\t2\n", b'\t').unwrap();
        SortFilterProxy::new(TablePresenter::new(Arc::new(table)))
    }

    #[test]
    fn presenter_dimensions_and_labels() {
        let p = proxy();
        let presenter = p.source();
        assert_eq!(presenter.row_count(), 4);
        assert_eq!(presenter.column_count(), 2);
        assert_eq!(presenter.header_label(1, Axis::Column).as_deref(), Some("value"));
        assert_eq!(presenter.header_label(3, Axis::Row).as_deref(), Some("3"));
        assert_eq!(presenter.header_label(4, Axis::Row), None);
        assert_eq!(presenter.cell_value(1, 1), "nan");
        assert_eq!(presenter.cell_value(0, 1), "2.0");
    }

    #[test]
    #[should_panic]
    fn out_of_range_cell_panics() {
        proxy().source().cell_value(10, 0);
    }

    #[test]
    fn toggle_cycles_and_is_stable() {
        let mut p = proxy();
        assert_eq!(p.toggle_sort(1).unwrap(), SortOrder::Ascending);
        assert_eq!(p.visible_rows(), [2, 0, 3, 1]);
        assert_eq!(p.header_label(0, Axis::Row).as_deref(), Some("2"));

        assert_eq!(p.toggle_sort(1).unwrap(), SortOrder::Descending);
        assert_eq!(p.visible_rows(), [0, 3, 2, 1]);

        assert_eq!(p.toggle_sort(1).unwrap(), SortOrder::Unsorted);
        assert_eq!(p.visible_rows(), [0, 1, 2, 3]);
        assert_eq!(p.sort_column(), None);
    }

    #[test]
    fn new_column_starts_ascending() {
        let mut p = proxy();
        p.toggle_sort(1).unwrap();
        assert_eq!(p.toggle_sort(0).unwrap(), SortOrder::Ascending);
        assert_eq!(p.cell_value(0, 0), "a");
    }

    #[test]
    fn filter_then_sort() {
        let mut p = proxy();
        p.set_filter(Some(RowFilter {
            column: Some(1),
            needle: "2".into(),
        }))
        .unwrap();
        assert_eq!(p.visible_rows(), [0, 3]);
        p.set_sort(0, SortOrder::Descending).unwrap();
        assert_eq!(p.visible_rows(), [3, 0]);
        p.set_filter(Some(RowFilter::any_column("A"))).unwrap();
        assert_eq!(p.visible_rows(), [1]);
    }

    #[test]
    fn bad_column_is_rejected() {
        let mut p = proxy();
        assert!(p.set_sort(5, SortOrder::Ascending).is_err());
        assert_eq!(p.visible_rows(), [0, 1, 2, 3]);
    }
}
