//! Workbook fixtures written with rust_xlsxwriter.

use rust_xlsxwriter::{Format, Workbook};

use bom_selector_models::CellValue;

pub struct SheetSpec {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetSpec {
    pub fn new(name: &str, headers: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

pub fn write_workbook(sheets: &[SheetSpec]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name.as_str()).unwrap();
        for (column, header) in sheet.headers.iter().enumerate() {
            if !header.is_empty() {
                worksheet.write_string(0, column as u16, header.as_str()).unwrap();
            }
        }
        for (row, cells) in sheet.rows.iter().enumerate() {
            let row = (row + 1) as u32;
            for (column, cell) in cells.iter().enumerate() {
                let column = column as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Number(value) => {
                        worksheet.write_number(row, column, *value).unwrap();
                    }
                    CellValue::Bool(value) => {
                        worksheet.write_boolean(row, column, *value).unwrap();
                    }
                    CellValue::Date(value) => {
                        worksheet
                            .write_datetime_with_format(row, column, value, &date_format)
                            .unwrap();
                    }
                    CellValue::Text(value) => {
                        worksheet.write_string(row, column, value.as_str()).unwrap();
                    }
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// A small closet catalog: two entries, one of which has no component sheet.
pub fn sample_catalog() -> Vec<u8> {
    write_workbook(&[
        SheetSpec::new(
            "BOM",
            &["Parent Code", "Description"],
            vec![
                vec!["SC-100".into(), "Closet 600".into()],
                vec!["SC-404".into(), "Closet without sheet".into()],
            ],
        ),
        SheetSpec::new(
            "SC-100",
            &["Part No", "Description", "Qty", "LP"],
            vec![
                vec!["P-1".into(), "Hinge".into(), CellValue::Number(4.0), CellValue::Number(12.0)],
                vec!["P-2".into(), "Rail".into(), CellValue::Number(2.0), CellValue::Number(30.0)],
                vec!["P-3".into(), "Screw".into(), CellValue::Number(40.0), CellValue::Number(0.5)],
            ],
        ),
    ])
}
