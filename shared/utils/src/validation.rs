use crate::error::{SelectorError, SelectorResult};
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> SelectorResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(SelectorError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, &error.code) {
                (Some(message), _) => message.to_string(),
                (None, std::borrow::Cow::Borrowed("length")) => {
                    format!("Length validation failed for field '{}'", field)
                }
                (None, std::borrow::Cow::Borrowed("range")) => {
                    format!("Value out of range for field '{}'", field)
                }
                (None, std::borrow::Cow::Borrowed("required")) => {
                    format!("Field '{}' is required", field)
                }
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> SelectorResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(SelectorError::validation(
            "file_type",
            format!("File type '{}' not allowed. Allowed types: {}", extension, allowed_types.join(", ")),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file_size: u64, max_size: u64) -> SelectorResult<()> {
    if file_size > max_size {
        return Err(SelectorError::validation(
            "file_size",
            format!("File size {} bytes exceeds maximum allowed size {} bytes", file_size, max_size),
        ));
    }

    Ok(())
}

/// Every index must address an existing data row.
pub fn validate_row_indices(indices: &[usize], row_count: usize) -> SelectorResult<()> {
    let out_of_range: Vec<String> = indices
        .iter()
        .filter(|&&index| index >= row_count)
        .map(|index| index.to_string())
        .collect();

    if !out_of_range.is_empty() {
        return Err(SelectorError::validation(
            "rows",
            format!(
                "Row indices out of range (sheet has {} rows): {}",
                row_count,
                out_of_range.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_price(row: usize, price: f64) -> SelectorResult<()> {
    if !price.is_finite() {
        return Err(SelectorError::validation(
            "price_edits",
            format!("Price for row {} must be a finite number", row),
        ));
    }

    Ok(())
}

/// A single path component: no separators, no `..`, not empty.
pub fn validate_path_component(field: &str, value: &str) -> SelectorResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0')
    {
        return Err(SelectorError::validation(
            field,
            format!("'{}' is not a valid name", value),
        ));
    }

    Ok(())
}
