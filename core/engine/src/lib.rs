//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the notification record engine.
//! CONTEXT: Re-exports the record model, schemas, date normalization and
//! configuration used by the trend, table, persistence and dashboard crates.

pub mod cell;
pub mod config;
pub mod date;
pub mod record;
pub mod schema;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use config::{ConfigError, DashboardConfig};
pub use date::{
    parse_date, parse_date_str, parse_timestamp_millis, CanonicalDate, ParseFailure,
    MONTH_NAMES_LONG, MONTH_NAMES_SHORT,
};
pub use record::{column_union, NotificationRecord};
pub use schema::{ColumnDef, FieldMapping, RecordSchema, SchemaError, SourceMapping, ValueKind};
