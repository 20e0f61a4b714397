//! Tabular dataset types for applicant records.
//!
//! A `RawTable` is the uploaded dataset as-is: named columns of
//! arbitrarily typed cells, with no guarantees about types, presence or
//! completeness. A `ProcessedTable` is the validated, fully numeric
//! matrix the model consumes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A single value from an uploaded dataset.
///
/// Coercion into model input is an explicit total function over this
/// type; nothing about a raw cell is trusted until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Interpret one CSV field.
    ///
    /// Empty (or whitespace-only) fields are missing values; fields that
    /// parse as a number become `Number`; everything else stays as text.
    pub fn from_csv_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(field.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// An uploaded dataset: named columns in file order, one `Vec<Cell>` per
/// column, all of equal length.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: IndexMap<String, Vec<Cell>>,
    num_rows: usize,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_csv_reader(file)
    }

    /// Read CSV data from any reader. The first record is the header row.
    ///
    /// Records shorter than the header are padded with missing cells;
    /// extra trailing fields are dropped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();

        // First occurrence wins when a header name repeats.
        let mut columns: IndexMap<String, Vec<Cell>> = IndexMap::new();
        let mut keep: Vec<bool> = Vec::with_capacity(headers.len());
        for header in &headers {
            keep.push(!columns.contains_key(header));
            columns.entry(header.clone()).or_default();
        }

        let mut num_rows = 0;
        for record in csv_reader.records() {
            let record = record?;
            for (index, header) in headers.iter().enumerate() {
                if !keep[index] {
                    continue;
                }
                let cell = record
                    .get(index)
                    .map(Cell::from_csv_field)
                    .unwrap_or(Cell::Missing);
                if let Some(column) = columns.get_mut(header) {
                    column.push(cell);
                }
            }
            num_rows += 1;
        }

        Ok(Self { columns, num_rows })
    }

    /// Add a column, padding or truncating to the table's row count when
    /// columns already exist.
    pub fn insert_column<S: Into<String>>(&mut self, name: S, mut cells: Vec<Cell>) {
        if self.columns.is_empty() {
            self.num_rows = cells.len();
        } else {
            cells.resize(self.num_rows, Cell::Missing);
        }
        self.columns.insert(name.into(), cells);
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in file order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }
}

/// The numeric feature matrix the model consumes.
///
/// Columns are exactly the schema's model features, in model order;
/// every cell is a finite number. Row count matches the raw input the
/// table was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTable {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ProcessedTable {
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == feature_names.len()));
        Self {
            feature_names,
            rows,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Row-major feature vectors, one per applicant.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Values of one column, in row order.
    pub fn column(&self, feature: &str) -> Option<Vec<f64>> {
        let index = self.feature_names.iter().position(|f| f == feature)?;
        Some(self.rows.iter().map(|r| r[index]).collect())
    }

    /// View the matrix as a raw table of numeric cells, e.g. for
    /// re-display or re-processing.
    pub fn to_raw(&self) -> RawTable {
        let mut table = RawTable::new();
        for (index, feature) in self.feature_names.iter().enumerate() {
            let cells = self.rows.iter().map(|r| Cell::Number(r[index])).collect();
            table.insert_column(feature.clone(), cells);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_csv_field() {
        assert_eq!(Cell::from_csv_field("0.5"), Cell::Number(0.5));
        assert_eq!(Cell::from_csv_field(" 42 "), Cell::Number(42.0));
        assert_eq!(Cell::from_csv_field("-3.2e1"), Cell::Number(-32.0));
        assert_eq!(Cell::from_csv_field("M"), Cell::Text("M".to_string()));
        assert_eq!(Cell::from_csv_field(""), Cell::Missing);
        assert_eq!(Cell::from_csv_field("   "), Cell::Missing);
    }

    #[test]
    fn test_from_csv_reader() {
        let data = "A,B,GENDER\n1,2.5,M\n,abc,F\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.column("A").unwrap()[0], Cell::Number(1.0));
        assert_eq!(table.column("A").unwrap()[1], Cell::Missing);
        assert_eq!(table.column("B").unwrap()[1], Cell::Text("abc".to_string()));
        assert_eq!(table.column("GENDER").unwrap()[0], Cell::Text("M".to_string()));
    }

    #[test]
    fn test_from_csv_reader_preserves_column_order() {
        let data = "Z,A,M\n1,2,3\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_from_csv_reader_zero_rows() {
        let data = "A,B\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_headers_first_wins() {
        let data = "A,A\n1,2\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.column("A").unwrap(), &[Cell::Number(1.0)]);
    }

    #[test]
    fn test_short_records_padded_with_missing() {
        let data = "A,B,C\n1,2\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.column("C").unwrap()[0], Cell::Missing);
    }

    #[test]
    fn test_processed_table_column_lookup() {
        let processed = ProcessedTable::new(
            vec!["X".to_string(), "Y".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        assert_eq!(processed.column("Y").unwrap(), vec![2.0, 4.0]);
        assert!(processed.column("Z").is_none());
    }

    #[test]
    fn test_processed_to_raw_round_trip_layout() {
        let processed = ProcessedTable::new(
            vec!["X".to_string(), "Y".to_string()],
            vec![vec![1.0, 2.0]],
        );
        let raw = processed.to_raw();
        assert_eq!(raw.num_rows(), 1);
        let names: Vec<&str> = raw.column_names().collect();
        assert_eq!(names, vec!["X", "Y"]);
        assert_eq!(raw.column("Y").unwrap()[0], Cell::Number(2.0));
    }
}
