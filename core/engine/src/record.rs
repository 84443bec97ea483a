//! FILENAME: core/engine/src/record.rs
//! PURPOSE: The notification record - an ordered column -> cell mapping.
//! CONTEXT: Column sets differ per data source, and export/import must keep
//! the column order the feed delivered, so a record is an insertion-ordered
//! list of pairs.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cell::CellValue;

/// One row of a notification feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationRecord {
    cells: Vec<(String, CellValue)>,
}

impl NotificationRecord {
    pub fn new() -> Self {
        NotificationRecord { cells: Vec::new() }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut record = NotificationRecord::new();
        for (column, value) in pairs {
            record.set(column, value);
        }
        record
    }

    /// Creates a row with every given column set to empty text.
    /// Used when a privileged user appends a row to the table.
    pub fn blank<S: AsRef<str>>(columns: &[S]) -> Self {
        NotificationRecord {
            cells: columns
                .iter()
                .map(|c| (c.as_ref().to_string(), CellValue::Text(String::new())))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Stringified cell content; missing columns read as the empty string.
    pub fn display(&self, column: &str) -> String {
        self.get(column).map(CellValue::display_value).unwrap_or_default()
    }

    /// Sets a column, replacing in place if present, appending otherwise.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ============================================================================
// SERDE (JSON object with preserved key order)
// ============================================================================

impl Serialize for NotificationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = NotificationRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object of column names to string, number, or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = NotificationRecord::new();
        while let Some((column, value)) = access.next_entry::<String, CellValue>()? {
            record.set(column, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for NotificationRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Collects the union of column names across records, in first-seen order.
pub fn column_union(records: &[NotificationRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for column in record.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}
