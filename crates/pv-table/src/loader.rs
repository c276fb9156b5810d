//! CSV/TSV loading with per-column type inference.

use std::path::Path;

use pv_core::TableCategory;
use tracing::debug;

use crate::cell::CellValue;
use crate::schema::schema_for;
use crate::table::LoadedTable;
use crate::{TableError, TableResult};

/// Strings read as missing values.
const NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
];

/// Loads a table and checks it against the column schema of `category`.
pub fn load_table(path: &Path, category: TableCategory) -> TableResult<LoadedTable> {
    let table = read_table(path)?;
    schema_for(category).check(&table)?;
    debug!(
        path = %path.display(),
        %category,
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );
    Ok(table)
}

/// Reads a delimited file without any schema check.
pub fn read_table(path: &Path) -> TableResult<LoadedTable> {
    let content = std::fs::read_to_string(path).map_err(|e| TableError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let delimiter = delimiter_for(path, &content);
    Ok(parse_table(&content, delimiter)?.with_source(path))
}

/// Picks the delimiter from the extension, falling back to the header line.
pub fn delimiter_for(path: &Path, content: &str) -> u8 {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => b',',
        Some("tsv") | Some("tab") => b'\t',
        _ => {
            let header = content.lines().next().unwrap_or_default();
            if header.contains('\t') { b'\t' } else { b',' }
        }
    }
}

pub fn parse_table(content: &str, delimiter: u8) -> TableResult<LoadedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(TableError::NoHeader);
    }

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (index, field) in record.iter().enumerate() {
            raw_columns[index].push(field.to_string());
        }
    }

    let mut names = Vec::with_capacity(headers.len());
    let mut columns = Vec::with_capacity(headers.len());
    for (index, (name, raw)) in headers.iter().zip(raw_columns).enumerate() {
        let name = name.trim();
        if name.is_empty() {
            // trailing delimiters produce an empty, unnamed column
            if raw.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            names.push(format!("Unnamed: {index}"));
        } else {
            names.push(name.to_string());
        }
        columns.push(infer_column(&raw));
    }

    let row_count = columns.first().map(Vec::len).unwrap_or(0);
    let mut rows = vec![Vec::with_capacity(columns.len()); row_count];
    for column in columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }

    LoadedTable::new(names, rows)
}

fn is_na(value: &str) -> bool {
    NA_VALUES.contains(&value.trim())
}

/// Integer column if every present value is an integer and nothing is
/// missing, float column if every present value parses as a number, text
/// otherwise.
fn infer_column(raw: &[String]) -> Vec<CellValue> {
    let present: Vec<&str> = raw
        .iter()
        .map(|v| v.trim())
        .filter(|v| !NA_VALUES.contains(v))
        .collect();
    let has_missing = present.len() != raw.len();

    let all_int = !present.is_empty() && present.iter().all(|v| v.parse::<i64>().is_ok());
    let all_float = !present.is_empty() && present.iter().all(|v| v.parse::<f64>().is_ok());

    raw.iter()
        .map(|value| {
            if is_na(value) {
                return CellValue::Missing;
            }
            let trimmed = value.trim();
            if all_int && !has_missing {
                trimmed.parse().map(CellValue::Int).unwrap_or(CellValue::Missing)
            } else if all_float {
                trimmed.parse().map(CellValue::Float).unwrap_or(CellValue::Missing)
            } else {
                CellValue::Text(value.clone())
            }
        })
        .collect()
}
