//! BOM Exporter
//!
//! Turns a component table with final include flags into the Final BOM and
//! its xlsx download.

use chrono::{NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{Format, Workbook};

use super::component::ComponentTable;
use crate::error::{SelectorError, SelectorResult};
use bom_selector_models::{ColumnTotal, CellValue, FinalBom, Table};

/// Sheet name of every exported workbook.
pub const EXPORT_SHEET: &str = "Final BOM";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Filter to the included rows and compute the advisory total.
///
/// An empty selection is a validation error; nothing is produced for it.
pub fn build_final_bom(tab: &str, components: &ComponentTable) -> SelectorResult<FinalBom> {
    let source_rows = components.included_rows();
    if source_rows.is_empty() {
        return Err(SelectorError::validation(
            "rows",
            "Please select at least one item to generate BOM.",
        ));
    }

    let table = components.table().select_rows(&source_rows);
    let total = components
        .summable_column()
        .filter(|&column| column < table.column_count())
        .map(|column| ColumnTotal {
            column: table.headers[column].clone(),
            value: table.column_sum(column),
        });

    Ok(FinalBom {
        tab: tab.to_string(),
        code: components.code().to_string(),
        source_rows,
        table,
        total,
    })
}

/// Serialize a Final BOM to an in-memory xlsx workbook.
///
/// One sheet named [`EXPORT_SHEET`], the header in the first row and no index
/// column. Empty cells are left unwritten.
pub fn write_xlsx(bom: &FinalBom) -> SelectorResult<Vec<u8>> {
    let buffer = write_table(&bom.table)?;

    tracing::info!(
        tab = %bom.tab,
        code = %bom.code,
        rows = bom.row_count(),
        bytes = buffer.len(),
        "Final BOM exported"
    );

    Ok(buffer)
}

fn write_table(table: &Table) -> SelectorResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET)?;

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (column, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, column as u16, header.as_str())?;
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = (row_index + 1) as u32;
        for (column, cell) in row.iter().enumerate() {
            let column = column as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Number(value) => {
                    worksheet.write_number(row_number, column, *value)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row_number, column, *value)?;
                }
                CellValue::Date(value) => {
                    let format = if has_time(value) { &datetime_format } else { &date_format };
                    worksheet.write_datetime_with_format(row_number, column, value, format)?;
                }
                CellValue::Text(value) => {
                    worksheet.write_string(row_number, column, value.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn has_time(value: &NaiveDateTime) -> bool {
    value.time() != NaiveTime::MIN
}
