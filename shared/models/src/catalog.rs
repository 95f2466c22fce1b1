//! Catalog index entries.

use serde::{Deserialize, Serialize};

/// One selectable row of a catalog's `BOM` index sheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Every cell of the index row joined with [`LABEL_DELIMITER`].
    pub label: String,
    /// The part code from the first column; also a sheet name.
    pub code: String,
}

pub const LABEL_DELIMITER: &str = " | ";

/// Where a catalog tab reads its workbook from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSourceKind {
    File,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub tab: String,
    pub kind: CatalogSourceKind,
    /// File name of the workbook, or the original upload name.
    pub source: String,
}
