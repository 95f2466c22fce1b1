//! Header-plus-rows tables loaded from worksheets.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// A rectangular sheet: one header row and zero or more data rows.
///
/// Rows are addressed by their 0-based position among the data rows, which is
/// the index users pick from when building a BOM.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding or truncating every row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column whose header is exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(column)
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: CellValue) -> bool {
        match self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    /// A column is numeric when every non-empty cell holds a number and at
    /// least one number is present.
    pub fn is_numeric_column(&self, column: usize) -> bool {
        if column >= self.column_count() {
            return false;
        }

        let mut seen_number = false;
        for cell in self.column(column) {
            match cell {
                CellValue::Empty => {}
                CellValue::Number(_) => seen_number = true,
                _ => return false,
            }
        }
        seen_number
    }

    /// Rightmost numeric column in original column order.
    pub fn last_numeric_column(&self) -> Option<usize> {
        (0..self.column_count())
            .rev()
            .find(|&column| self.is_numeric_column(column))
    }

    /// Sum of the numbers in a column; non-numeric cells are skipped.
    pub fn column_sum(&self, column: usize) -> f64 {
        self.column(column).filter_map(CellValue::as_number).sum()
    }

    /// New table holding the given rows in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&index| self.rows.get(index).cloned())
                .collect(),
        }
    }
}
