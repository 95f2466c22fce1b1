//! Cell values as read from catalog workbooks.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude printed as an integer by [`CellValue`]'s `Display`.
const INTEGER_DISPLAY_LIMIT: f64 = 1e15;

/// A single spreadsheet cell.
///
/// Date-formatted cells are [`CellValue::Date`]. Durations and cell errors
/// are carried as [`CellValue::Text`] holding their string form; only real
/// numbers take part in sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Empty, or text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Date(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Date(value) => f.write_str(&format_date(value)),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Whole numbers print without a fractional part so that numeric part codes
/// match the sheet names they refer to (`1001`, not `1001.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Midnight timestamps print as the bare date.
pub fn format_date(value: &NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(1001.0).to_string(), "1001");
        assert_eq!(CellValue::Number(-3.0).to_string(), "-3");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_date_display() {
        let midnight = CellValue::Date(date(2023, 7, 15).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(midnight.to_string(), "2023-07-15");

        let afternoon = CellValue::Date(date(2023, 7, 15).and_hms_opt(14, 30, 5).unwrap());
        assert_eq!(afternoon.to_string(), "2023-07-15 14:30:05");
        assert!(!afternoon.is_number());
        assert!(!afternoon.is_blank());
    }

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::text("SC-100").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_untagged_json() {
        let cells = vec![
            CellValue::Empty,
            CellValue::Bool(true),
            CellValue::Number(2.5),
            CellValue::Date(date(2023, 7, 15).and_hms_opt(0, 0, 0).unwrap()),
            CellValue::text("bolt"),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,true,2.5,"2023-07-15T00:00:00","bolt"]"#);

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }
}
