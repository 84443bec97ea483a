//! FILENAME: core/persistence/src/lib.rs
//! Notification table persistence.
//!
//! Exports the filtered table to a single-sheet XLSX workbook and imports
//! the first sheet of a workbook back into records. The first row of the
//! sheet is always the header.

mod error;
mod xlsx_reader;
mod xlsx_writer;

pub use error::PersistenceError;
pub use xlsx_reader::{import_xlsx, import_xlsx_from_buffer};
pub use xlsx_writer::{export_headers, export_xlsx, export_xlsx_to_buffer};

use chrono::NaiveDate;
use engine::NotificationRecord;
use serde::{Deserialize, Serialize};

/// Default worksheet name on export.
pub const DEFAULT_SHEET_NAME: &str = "Data";

/// Column width bounds, in character units.
pub const MIN_COLUMN_WIDTH: u32 = 15;
pub const MAX_COLUMN_WIDTH: u32 = 50;

/// Excel's column limit.
pub(crate) const MAX_COLUMNS: usize = 16_384;

// ============================================================================
// IMPORTED TABLE
// ============================================================================

/// Rows read from the first sheet, keyed by the header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportedTable {
    pub columns: Vec<String>,
    pub rows: Vec<NotificationRecord>,
}

impl ImportedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// EXPORT HELPERS
// ============================================================================

/// `"{title}_{YYYY-MM-DD}.xlsx"` with each whitespace run in the title
/// replaced by a single underscore.
pub fn export_filename(title: &str, date: NaiveDate) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(ch);
            in_space = false;
        }
    }
    format!("{}_{}.xlsx", stem, date.format("%Y-%m-%d"))
}

/// Width per column: `clamp(ceil(max(header, longest cell) * 1.2), 15, 50)`.
pub fn column_widths<S: AsRef<str>>(columns: &[S], rows: &[NotificationRecord]) -> Vec<u32> {
    columns
        .iter()
        .map(|column| {
            let column = column.as_ref();
            let longest = rows
                .iter()
                .map(|r| r.display(column).chars().count())
                .max()
                .unwrap_or(0)
                .max(column.chars().count());
            let width = (longest as f64 * 1.2).ceil() as u32;
            width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}
