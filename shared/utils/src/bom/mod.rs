//! BOM Selection Workflow
//!
//! Catalog loader, component table builder and BOM exporter for catalog
//! workbooks: a `BOM` index sheet plus one sheet per part code.

pub mod catalog;
pub mod component;
pub mod exporter;
pub mod pipeline;
pub mod workbook;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{display_label, Catalog, INDEX_SHEET};
pub use component::ComponentTable;
pub use exporter::{build_final_bom, write_xlsx, EXPORT_SHEET, XLSX_CONTENT_TYPE};
pub use pipeline::{catalog_components, load_catalog, load_components, run_pipeline};
pub use workbook::{CatalogWorkbook, WorkbookSource};
