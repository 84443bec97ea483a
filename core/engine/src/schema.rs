//! FILENAME: core/engine/src/schema.rs
//! PURPOSE: Declared column layout for a notification data source.
//! CONTEXT: Which column holds the date, the entity, and the summary is fixed
//! once per source and validated at construction. Filters and aggregators
//! ask the schema instead of guessing from header names row by row.
//!
//! `SourceMapping` turns raw API rows (`entity_name`, `pdf_link`, ...) into
//! the display columns a schema declares.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::CellValue;
use crate::record::NotificationRecord;

/// Errors raised while declaring a schema or mapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("designated {role} column '{column}' is not part of the schema")]
    UnknownColumn { role: &'static str, column: String },

    #[error("schema declares no columns")]
    Empty,

    #[error("schema has no designated {0} column")]
    MissingRole(&'static str),
}

/// What kind of value a column is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Text,
    Number,
    Date,
    Link,
}

/// One declared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ValueKind,
}

/// The ordered column list of a source plus its designated roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSchema {
    columns: Vec<ColumnDef>,
    date_column: Option<String>,
    entity_column: Option<String>,
    summary_column: Option<String>,
}

impl RecordSchema {
    pub fn new<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, ValueKind)>,
        S: Into<String>,
    {
        let mut defs: Vec<ColumnDef> = Vec::new();
        for (name, kind) in columns {
            let name = name.into();
            if defs.iter().any(|d| d.name == name) {
                return Err(SchemaError::DuplicateColumn(name));
            }
            defs.push(ColumnDef { name, kind });
        }
        if defs.is_empty() {
            return Err(SchemaError::Empty);
        }
        Ok(RecordSchema {
            columns: defs,
            date_column: None,
            entity_column: None,
            summary_column: None,
        })
    }

    fn check(&self, role: &'static str, column: &str) -> Result<String, SchemaError> {
        if self.has_column(column) {
            Ok(column.to_string())
        } else {
            Err(SchemaError::UnknownColumn {
                role,
                column: column.to_string(),
            })
        }
    }

    pub fn with_date_column(mut self, column: &str) -> Result<Self, SchemaError> {
        self.date_column = Some(self.check("date", column)?);
        Ok(self)
    }

    pub fn with_entity_column(mut self, column: &str) -> Result<Self, SchemaError> {
        self.entity_column = Some(self.check("entity", column)?);
        Ok(self)
    }

    pub fn with_summary_column(mut self, column: &str) -> Result<Self, SchemaError> {
        self.summary_column = Some(self.check("summary", column)?);
        Ok(self)
    }

    /// Re-validates designations, e.g. after deserializing a schema from config.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (i, def) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|d| d.name == def.name) {
                return Err(SchemaError::DuplicateColumn(def.name.clone()));
            }
        }
        let roles = [
            ("date", &self.date_column),
            ("entity", &self.entity_column),
            ("summary", &self.summary_column),
        ];
        for (role, column) in roles {
            if let Some(column) = column {
                self.check(role, column)?;
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    pub fn date_column(&self) -> Option<&str> {
        self.date_column.as_deref()
    }

    pub fn entity_column(&self) -> Option<&str> {
        self.entity_column.as_deref()
    }

    pub fn summary_column(&self) -> Option<&str> {
        self.summary_column.as_deref()
    }

    // ========================================================================
    // PRESETS (one per dashboard flow)
    // ========================================================================

    /// BSE corporate-announcement feed.
    pub fn bse() -> Self {
        RecordSchema {
            columns: vec![
                col("Name of Entity", ValueKind::Text),
                col("Link to Intimation", ValueKind::Link),
                col("Nature of Intimation", ValueKind::Text),
                col("Summary of Intimation", ValueKind::Text),
                col("Date", ValueKind::Date),
            ],
            date_column: Some("Date".to_string()),
            entity_column: Some("Name of Entity".to_string()),
            summary_column: Some("Summary of Intimation".to_string()),
        }
    }

    /// SEBI circulars. The feed has no entity concept.
    pub fn sebi() -> Self {
        RecordSchema {
            columns: vec![
                col("Date", ValueKind::Date),
                col("PDF Link", ValueKind::Link),
                col("Summary", ValueKind::Text),
            ],
            date_column: Some("Date".to_string()),
            entity_column: None,
            summary_column: Some("Summary".to_string()),
        }
    }

    /// RBI notifications. Same shape as SEBI.
    pub fn rbi() -> Self {
        Self::sebi()
    }
}

fn col(name: &str, kind: ValueKind) -> ColumnDef {
    ColumnDef {
        name: name.to_string(),
        kind,
    }
}

// ============================================================================
// SOURCE MAPPING
// ============================================================================

/// Maps one raw API field onto a display column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub column: String,
    /// Substituted when the source value is missing, null, or empty text.
    #[serde(default)]
    pub fallback: Option<String>,
}

/// Converts raw feed rows into schema rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapping {
    pub fields: Vec<FieldMapping>,
    /// Raw fields whose literal value `NIL` drops the whole row.
    #[serde(default)]
    pub drop_when_nil: Vec<String>,
}

impl SourceMapping {
    /// Checks that every target column exists in `schema`.
    pub fn validate(&self, schema: &RecordSchema) -> Result<(), SchemaError> {
        for field in &self.fields {
            if !schema.has_column(&field.column) {
                return Err(SchemaError::UnknownColumn {
                    role: "mapped",
                    column: field.column.clone(),
                });
            }
        }
        Ok(())
    }

    /// Maps a single raw row. Returns None when a `drop_when_nil` field is `NIL`.
    pub fn map_row(&self, raw: &NotificationRecord) -> Option<NotificationRecord> {
        for field in &self.drop_when_nil {
            if raw.get(field).and_then(CellValue::as_text) == Some("NIL") {
                return None;
            }
        }

        let mut row = NotificationRecord::new();
        for mapping in &self.fields {
            let value = raw.get(&mapping.source_field).cloned().unwrap_or_default();
            let missing = matches!(&value, CellValue::Empty)
                || matches!(&value, CellValue::Text(s) if s.is_empty());
            let value = match (&mapping.fallback, missing) {
                (Some(fallback), true) => CellValue::Text(fallback.clone()),
                _ => value,
            };
            row.set(mapping.column.clone(), value);
        }
        Some(row)
    }

    pub fn map_rows(&self, raw: &[NotificationRecord]) -> Vec<NotificationRecord> {
        raw.iter().filter_map(|r| self.map_row(r)).collect()
    }

    pub fn bse() -> Self {
        SourceMapping {
            fields: vec![
                field("entity_name", "Name of Entity", Some("Unknown Entity")),
                field("pdf_link", "Link to Intimation", None),
                field("nature", "Nature of Intimation", Some("N/A")),
                field("summary", "Summary of Intimation", None),
                field("date_key", "Date", None),
            ],
            drop_when_nil: Vec::new(),
        }
    }

    pub fn sebi() -> Self {
        SourceMapping {
            fields: vec![
                field("date_key", "Date", None),
                field("pdf_link", "PDF Link", None),
                field("summary", "Summary", None),
            ],
            drop_when_nil: vec!["pdf_link".to_string(), "summary".to_string()],
        }
    }

    pub fn rbi() -> Self {
        Self::sebi()
    }
}

fn field(source: &str, column: &str, fallback: Option<&str>) -> FieldMapping {
    FieldMapping {
        source_field: source.to_string(),
        column: column.to_string(),
        fallback: fallback.map(str::to_string),
    }
}
