//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the value held by a single column of a notification record.
//! CONTEXT: Upstream feeds and imported workbooks deliver loosely-typed cells:
//! a string, a number, or nothing at all. `CellValue` keeps that shape and
//! provides the stringification every filter and export relies on.

use serde::{Deserialize, Serialize};

/// The raw content of one cell.
/// Deserializes from JSON `null`, numbers, and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Returns the display value of the cell as a String.
    /// This is what substring filters match against and what the
    /// spreadsheet export measures for column widths.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
        }
    }

    /// True when the cell carries no usable content: missing, or text that
    /// trims to nothing or to a serialized placeholder (`null`, `undefined`).
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(_) => false,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || trimmed == "null" || trimmed == "undefined"
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}
