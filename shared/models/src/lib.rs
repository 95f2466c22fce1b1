//! # BOM Selector Domain Models
//!
//! Serde types shared by the workflow crate and the web service.
//!
//! ## Key Models
//!
//! - **CellValue**: a single worksheet cell (empty, bool, number or text)
//! - **Table**: one header row plus data rows, with the numeric-column helpers
//!   the exporter needs
//! - **CatalogEntry**: a `(label, code)` pair from a catalog's `BOM` sheet
//! - **SelectionRequest**: the include set, select-all toggle and price edits of
//!   one submission
//! - **FinalBom**: the filtered table produced by a submission

pub mod bom;
pub mod catalog;
pub mod cell;
pub mod table;


pub use bom::*;
pub use catalog::*;
pub use cell::*;
pub use table::*;
