//! In-memory tables shared by the loader, the reconciliation engine and the report writer

use crate::error::{Result, TabreconError};
use chrono::NaiveDateTime;
use indexmap::IndexSet;
use serde::Serialize;

/// A raw spreadsheet cell before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for missing cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell, accepting numeric-looking text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_finite() => Some(*f),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Plain textual rendering, without trimming or case folding
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Integral floats render without a fractional part so `100.0` and `100` compare equal
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

/// A rectangular table with an ordered, unique set of column names.
///
/// Rows are stored positionally; every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<V> {
    columns: IndexSet<String>,
    rows: Vec<Vec<V>>,
}

/// Table of cells as read from a spreadsheet
pub type RawTable = Table<CellValue>;

/// Table of canonical strings produced by the normalizer
pub type NormalizedTable = Table<String>;

impl<V> Table<V> {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for column in columns {
            let column = column.into();
            if !set.insert(column.clone()) {
                return Err(TabreconError::invalid_input(format!(
                    "Duplicate column name: '{}'",
                    column
                )));
            }
        }
        Ok(Self {
            columns: set,
            rows: Vec::new(),
        })
    }

    /// Create a table from columns and rows in one go
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<V>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Vec<V>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TabreconError::invalid_input(format!(
                "Row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &IndexSet<String> {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn rows(&self) -> &[Vec<V>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[V]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<&V> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate the values of the column at position `index`
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &V> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Copy of this table restricted to the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self
    where
        V: Clone,
    {
        Self {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Build a table with the same shape by transforming each column
    pub(crate) fn from_parts(columns: IndexSet<String>, rows: Vec<Vec<V>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }
}

impl Table<String> {
    /// Value of `column` in row `row`, with missing cells read as ""
    pub fn value(&self, row: usize, column: &str) -> &str {
        self.get(row, column).map(String::as_str).unwrap_or("")
    }
}

impl Table<CellValue> {
    /// Convenience constructor for text-only tables
    pub fn from_text(columns: &[&str], rows: &[&[&str]]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| CellValue::from(*s)).collect())
            .collect();
        Self::from_rows(columns.iter().copied(), rows)
    }
}
