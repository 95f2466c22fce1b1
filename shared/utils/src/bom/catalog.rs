//! Catalog Loader
//!
//! Reads a catalog workbook's `BOM` index sheet into selectable entries.

use std::collections::BTreeMap;

use super::workbook::CatalogWorkbook;
use crate::error::{SelectorError, SelectorResult};
use bom_selector_models::{CatalogEntry, CellValue, Table, LABEL_DELIMITER};

/// Name of the index sheet every catalog workbook carries.
pub const INDEX_SHEET: &str = "BOM";

/// The selectable entries of one catalog, sorted by label.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    dropped_rows: Vec<usize>,
}

impl Catalog {
    /// Load the `BOM` sheet of an opened workbook.
    pub fn load(workbook: &mut CatalogWorkbook) -> SelectorResult<Self> {
        if !workbook.has_sheet(INDEX_SHEET) {
            return Err(SelectorError::schema(format!(
                "'{}' sheet not found in {}",
                INDEX_SHEET,
                workbook.name()
            )));
        }

        let index = workbook.read_table(INDEX_SHEET)?;
        let catalog = Self::from_index(&index);

        tracing::debug!(
            workbook = %workbook.name(),
            entries = catalog.entries.len(),
            dropped = catalog.dropped_rows.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Build entries from an index table.
    ///
    /// Rows with a blank first cell carry no part code and are not entries.
    /// When two rows produce the same label the later row's code wins.
    pub fn from_index(index: &Table) -> Self {
        let mut by_label: BTreeMap<String, String> = BTreeMap::new();
        let mut dropped_rows = Vec::new();

        for (row_index, row) in index.rows.iter().enumerate() {
            let code = match row.first() {
                Some(cell) if !cell.is_blank() => cell.to_string().trim().to_string(),
                _ => {
                    tracing::debug!(row = row_index, "Index row without part code skipped");
                    dropped_rows.push(row_index);
                    continue;
                }
            };

            by_label.insert(display_label(row), code);
        }

        let entries = by_label
            .into_iter()
            .map(|(label, code)| CatalogEntry { label, code })
            .collect();

        Self {
            entries,
            dropped_rows,
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index-sheet rows that were not turned into entries.
    pub fn dropped_rows(&self) -> &[usize] {
        &self.dropped_rows
    }

    /// Code selected by a display label.
    pub fn resolve(&self, label: &str) -> SelectorResult<&str> {
        self.entries
            .binary_search_by(|entry| entry.label.as_str().cmp(label))
            .map(|position| self.entries[position].code.as_str())
            .map_err(|_| SelectorError::validation("entry", format!("Unknown BOM entry '{}'", label)))
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.iter().any(|entry| entry.code == code)
    }
}

/// All cells of a row joined with `" | "`.
pub fn display_label(row: &[CellValue]) -> String {
    row.iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(LABEL_DELIMITER)
}
