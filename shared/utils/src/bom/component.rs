//! Component Table Builder
//!
//! Loads the component sheet for a part code and tracks which of its rows are
//! included in the BOM being built.

use std::collections::{BTreeMap, BTreeSet};

use super::workbook::CatalogWorkbook;
use crate::error::SelectorResult;
use crate::validation::{validate_price, validate_row_indices};
use bom_selector_models::{CellValue, ComponentView, PriceCell, SelectionRequest, Table, PRICE_COLUMN};

/// A component sheet plus per-row include flags.
///
/// Flags start out false and live only as long as this value; loading the
/// sheet again starts from a clean selection.
#[derive(Debug, Clone)]
pub struct ComponentTable {
    code: String,
    table: Table,
    include: Vec<bool>,
    summable_column: Option<usize>,
    price_column: Option<usize>,
}

impl ComponentTable {
    /// Load the sheet named exactly `code`.
    pub fn load(workbook: &mut CatalogWorkbook, code: &str) -> SelectorResult<Self> {
        let table = workbook.read_table(code)?;
        Ok(Self::from_table(code, table))
    }

    pub fn from_table(code: impl Into<String>, table: Table) -> Self {
        let summable_column = table.last_numeric_column();
        let price_column = table.column_index(PRICE_COLUMN);
        let include = vec![false; table.row_count()];

        Self {
            code: code.into(),
            table,
            include,
            summable_column,
            price_column,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    /// Rightmost all-numeric column, fixed when the sheet is loaded.
    pub fn summable_column(&self) -> Option<usize> {
        self.summable_column
    }

    pub fn summable_header(&self) -> Option<&str> {
        self.summable_column
            .and_then(|column| self.table.headers.get(column))
            .map(String::as_str)
    }

    pub fn price_column(&self) -> Option<usize> {
        self.price_column
    }

    pub fn include_flags(&self) -> &[bool] {
        &self.include
    }

    pub fn is_included(&self, row: usize) -> bool {
        self.include.get(row).copied().unwrap_or(false)
    }

    pub fn included_rows(&self) -> Vec<usize> {
        self.include
            .iter()
            .enumerate()
            .filter_map(|(row, included)| included.then_some(row))
            .collect()
    }

    /// The select-all control. Returns the row-selection input it seeds:
    /// every row when switched on, nothing when switched off. Earlier
    /// individual choices are overwritten either way.
    pub fn toggle_all(&mut self, select_all: bool) -> Vec<usize> {
        self.include.iter_mut().for_each(|flag| *flag = select_all);
        self.included_rows()
    }

    /// Make `rows` the complete include set.
    pub fn select_rows(&mut self, rows: &[usize]) -> SelectorResult<()> {
        validate_row_indices(rows, self.row_count())?;

        let wanted: BTreeSet<usize> = rows.iter().copied().collect();
        for (row, flag) in self.include.iter_mut().enumerate() {
            *flag = wanted.contains(&row);
        }
        Ok(())
    }

    /// Make `rows` the include set, ignoring rows the sheet does not have.
    ///
    /// Used when re-showing an earlier selection against a sheet that may
    /// have changed since.
    pub fn restore_selection(&mut self, rows: &[usize]) {
        let wanted: BTreeSet<usize> = rows.iter().copied().collect();
        let stale = wanted.iter().filter(|&&row| row >= self.row_count()).count();
        if stale > 0 {
            tracing::debug!(code = %self.code, stale, "Selected rows outside the sheet ignored");
        }

        for (row, flag) in self.include.iter_mut().enumerate() {
            *flag = wanted.contains(&row);
        }
    }

    /// `LP` values of the included rows, as offered for editing.
    pub fn price_cells(&self) -> Vec<PriceCell> {
        let Some(column) = self.price_column else {
            return Vec::new();
        };

        self.included_rows()
            .into_iter()
            .map(|row| PriceCell {
                row,
                value: self.table.cell(row, column).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Write edited `LP` values back into the sheet.
    ///
    /// Only rows included right now are touched. Returns how many cells changed.
    pub fn apply_price_edits(&mut self, edits: &BTreeMap<usize, f64>) -> SelectorResult<usize> {
        if edits.is_empty() {
            return Ok(0);
        }

        let Some(column) = self.price_column else {
            tracing::warn!(code = %self.code, "Price edits ignored: sheet has no {} column", PRICE_COLUMN);
            return Ok(0);
        };

        for (&row, &price) in edits {
            validate_price(row, price)?;
        }

        let mut applied = 0;
        for (&row, &price) in edits {
            if !self.is_included(row) {
                tracing::debug!(code = %self.code, row, "Price edit for excluded row ignored");
                continue;
            }
            if self.table.set_cell(row, column, CellValue::Number(price)) {
                applied += 1;
            }
        }

        Ok(applied)
    }

    /// Apply one submission: seed from select-all, let an explicit row list
    /// override it, then apply price edits.
    pub fn apply(&mut self, request: &SelectionRequest) -> SelectorResult<()> {
        self.toggle_all(request.select_all);
        if let Some(rows) = &request.rows {
            self.select_rows(rows)?;
        }
        self.apply_price_edits(&request.price_edits)?;
        Ok(())
    }

    pub fn view(&self) -> ComponentView {
        ComponentView {
            code: self.code.clone(),
            headers: self.table.headers.clone(),
            rows: self.table.rows.clone(),
            summable_column: self.summable_header().map(str::to_string),
            has_price_column: self.price_column.is_some(),
        }
    }
}
