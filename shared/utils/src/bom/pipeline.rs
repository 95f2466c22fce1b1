//! BOM Selection Pipeline
//!
//! Loader, builder and exporter strung together as plain functions of their
//! inputs. Every request runs them afresh from the workbook.

use super::catalog::Catalog;
use super::component::ComponentTable;
use super::exporter::build_final_bom;
use super::workbook::{CatalogWorkbook, WorkbookSource};
use crate::error::{SelectorError, SelectorResult};
use crate::validation::validate_model;
use bom_selector_models::{FinalBom, SelectionRequest};

/// Entries of a catalog's `BOM` sheet.
pub fn load_catalog(source: &WorkbookSource) -> SelectorResult<Catalog> {
    let mut workbook = source.open()?;
    Catalog::load(&mut workbook)
}

/// The component sheet for `code`, with a clean selection.
///
/// The code must be one of the catalog's entries.
pub fn load_components(source: &WorkbookSource, code: &str) -> SelectorResult<ComponentTable> {
    let mut workbook = source.open()?;
    let catalog = Catalog::load(&mut workbook)?;
    catalog_components(&mut workbook, &catalog, code)
}

/// Like [`load_components`], for a workbook whose catalog is already loaded.
pub fn catalog_components(
    workbook: &mut CatalogWorkbook,
    catalog: &Catalog,
    code: &str,
) -> SelectorResult<ComponentTable> {
    if !catalog.contains_code(code) {
        return Err(SelectorError::validation(
            "code",
            format!("'{}' is not an entry of {}", code, workbook.name()),
        ));
    }

    ComponentTable::load(workbook, code)
}

/// `(source, request) -> FinalBom`, with no state kept between calls.
pub fn run_pipeline(tab: &str, source: &WorkbookSource, request: &SelectionRequest) -> SelectorResult<FinalBom> {
    validate_model(request)?;

    let mut components = load_components(source, &request.code)?;
    components.apply(request)?;
    build_final_bom(tab, &components)
}
