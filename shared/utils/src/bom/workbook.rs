//! Catalog Workbook Access
//!
//! Opens catalog workbooks from disk or from uploaded bytes and reads sheets
//! into [`Table`]s.

use calamine::{open_workbook_from_rs, DataType, Reader, Xlsx};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{SelectorError, SelectorResult};
use bom_selector_models::{CellValue, Table};

/// Where a catalog workbook comes from.
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    File(PathBuf),
    Upload { name: String, data: Arc<[u8]> },
}

impl WorkbookSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn upload(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Upload {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Display name: the file name of a path, or the upload's original name.
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Upload { name, .. } => name.clone(),
        }
    }

    pub fn open(&self) -> SelectorResult<CatalogWorkbook> {
        let data: Arc<[u8]> = match self {
            Self::File(path) => read_file(path)?,
            Self::Upload { data, .. } => Arc::clone(data),
        };

        CatalogWorkbook::from_bytes(self.name(), data)
    }
}

fn read_file(path: &Path) -> SelectorResult<Arc<[u8]>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Arc::from(bytes)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Err(SelectorError::not_found(path.display().to_string()))
        }
        Err(error) => Err(SelectorError::spreadsheet(format!(
            "Failed to read '{}': {}",
            path.display(),
            error
        ))),
    }
}

/// An opened xlsx workbook.
pub struct CatalogWorkbook {
    name: String,
    sheet_names: Vec<String>,
    inner: Xlsx<Cursor<Arc<[u8]>>>,
}

impl CatalogWorkbook {
    pub fn from_bytes(name: impl Into<String>, data: Arc<[u8]>) -> SelectorResult<Self> {
        let name = name.into();
        let inner: Xlsx<_> = open_workbook_from_rs(Cursor::new(data)).map_err(|e: calamine::XlsxError| {
            SelectorError::spreadsheet(format!("Failed to open workbook '{}': {}", name, e))
        })?;
        let sheet_names = inner.sheet_names().to_vec();

        Ok(Self {
            name,
            sheet_names,
            inner,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names.iter().any(|name| name == sheet)
    }

    /// Read a sheet whose first row is the header.
    ///
    /// Empty header cells are named `Unnamed: <column>` and repeated names get a
    /// `.1`, `.2`, ... suffix. Columns to the left of the first used cell are
    /// kept so column positions match the worksheet.
    pub fn read_table(&mut self, sheet: &str) -> SelectorResult<Table> {
        if !self.has_sheet(sheet) {
            return Err(SelectorError::schema(format!(
                "Sheet `{}` not found in {}",
                sheet, self.name
            )));
        }

        let range = self
            .inner
            .worksheet_range(sheet)
            .ok_or_else(|| SelectorError::schema(format!("Sheet `{}` not found in {}", sheet, self.name)))??;

        let leading_columns = range.start().map(|(_, column)| column as usize).unwrap_or(0);
        let mut rows = range.rows().map(|row| {
            let mut cells = vec![CellValue::Empty; leading_columns];
            cells.extend(row.iter().map(cell_value));
            cells
        });

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => dedupe_headers(
                header_row
                    .iter()
                    .enumerate()
                    .map(|(column, cell)| {
                        if cell.is_blank() {
                            format!("Unnamed: {}", column)
                        } else {
                            cell.to_string().trim().to_string()
                        }
                    })
                    .collect(),
            ),
            None => Vec::new(),
        };

        Ok(Table::new(headers, rows.collect()))
    }
}

/// Rename repeated headers to `name.1`, `name.2`, ... in column order,
/// skipping suffixes already taken by another column.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = headers.iter().cloned().collect();
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let count = seen.entry(header.clone()).or_insert(0);
        if *count == 0 {
            *count = 1;
            result.push(header);
            continue;
        }

        let mut renamed = format!("{}.{}", header, count);
        while taken.contains(&renamed) {
            *count += 1;
            renamed = format!("{}.{}", header, count);
        }
        *count += 1;
        taken.insert(renamed.clone());
        result.push(renamed);
    }

    result
}

/// Convert a calamine cell into a [`CellValue`].
pub fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::String(value) if value.is_empty() => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::DateTime(_) | DataType::DateTimeIso(_) => match cell.as_datetime() {
            Some(value) => CellValue::Date(value),
            None => CellValue::Text(cell.to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}
