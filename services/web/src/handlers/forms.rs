//! Form bodies of the component and Final BOM pages.

use bom_selector_models::SelectionRequest;
use bom_selector_utils::{SelectorError, SelectorResult};

const PRICE_FIELD_PREFIX: &str = "lp_";

/// Build a request from urlencoded pairs: `code`, repeated `rows`,
/// `select_all` and `lp_<row>`.
///
/// A submitted form always carries its checkbox state, so `rows` is the
/// explicit include list even when no box is ticked. Blank price fields are
/// left unchanged.
pub fn selection_from_form(pairs: &[(String, String)]) -> SelectorResult<SelectionRequest> {
    let mut request = SelectionRequest::default();
    let mut rows = Vec::new();

    for (key, value) in pairs {
        match key.as_str() {
            "code" => request.code = value.trim().to_string(),
            "select_all" => request.select_all = is_checked(value),
            "rows" => rows.push(parse_row("rows", value)?),
            _ => {
                if let Some(row) = key.strip_prefix(PRICE_FIELD_PREFIX) {
                    let row = parse_row(key, row)?;
                    let value = value.trim();
                    if value.is_empty() {
                        continue;
                    }
                    let price = value.parse::<f64>().map_err(|_| {
                        SelectorError::validation(key.clone(), format!("'{}' is not a valid LP value", value))
                    })?;
                    request.price_edits.insert(row, price);
                }
            }
        }
    }

    request.rows = Some(rows);
    Ok(request)
}

fn parse_row(field: &str, value: &str) -> SelectorResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| SelectorError::validation(field, format!("'{}' is not a row index", value)))
}

fn is_checked(value: &str) -> bool {
    matches!(value, "true" | "on" | "1")
}
