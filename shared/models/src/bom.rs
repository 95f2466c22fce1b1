//! Selection requests and the exported Final BOM.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::cell::CellValue;
use crate::table::Table;

/// Name of the price column whose values may be edited before export.
pub const PRICE_COLUMN: &str = "LP";

/// Everything one submission says about a component sheet.
///
/// `rows`, when present, is the authoritative include list. When absent the
/// `select_all` toggle seeds it: every row when set, none otherwise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct SelectionRequest {
    #[validate(length(min = 1, max = 255, message = "Part code must be between 1 and 255 characters"))]
    pub code: String,
    #[serde(default)]
    pub rows: Option<Vec<usize>>,
    #[serde(default)]
    pub select_all: bool,
    /// Edited `LP` values keyed by row index.
    #[serde(default)]
    pub price_edits: BTreeMap<usize, f64>,
}

impl SelectionRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.rows = Some(rows.into_iter().collect());
        self
    }

    pub fn with_select_all(mut self, select_all: bool) -> Self {
        self.select_all = select_all;
        self
    }

    pub fn with_price(mut self, row: usize, price: f64) -> Self {
        self.price_edits.insert(row, price);
        self
    }
}

/// Advisory total shown next to the Final BOM; never written to the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTotal {
    pub column: String,
    pub value: f64,
}

/// The filtered, column-trimmed table for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalBom {
    pub tab: String,
    pub code: String,
    /// Source row index of each exported row, in output order.
    pub source_rows: Vec<usize>,
    pub table: Table,
    pub total: Option<ColumnTotal>,
}

/// One editable `LP` cell, keyed by its row index in the component sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCell {
    pub row: usize,
    pub value: CellValue,
}

impl FinalBom {
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    /// `LP` values of the exported rows, keyed by source row.
    pub fn price_cells(&self) -> Vec<PriceCell> {
        let Some(column) = self.table.column_index(PRICE_COLUMN) else {
            return Vec::new();
        };

        self.source_rows
            .iter()
            .zip(&self.table.rows)
            .map(|(&row, cells)| PriceCell {
                row,
                value: cells.get(column).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// `<tab>_Final_BOM.xlsx`, with anything outside `[A-Za-z0-9_-]` replaced.
    pub fn file_name(&self) -> String {
        export_file_name(&self.tab)
    }
}

pub fn export_file_name(tab: &str) -> String {
    let safe: String = tab
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("{}_Final_BOM.xlsx", safe)
}

/// Read-only view of a component sheet, as served to clients before selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentView {
    pub code: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub summable_column: Option<String>,
    pub has_price_column: bool,
}
