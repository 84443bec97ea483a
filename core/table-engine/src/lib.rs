//! FILENAME: core/table-engine/src/lib.rs
//! Tabular view subsystem.
//!
//! Filtering, pagination and inline editing over a notification record set.
//! Depends on `engine` for records, schemas and date parsing.
//!
//! Layers:
//! - `filter`: Validity rules, column filters, date range
//! - `paginate`: Page windows and index clamping
//! - `model`: The view model (edit state machine, privilege gate)

pub mod error;
pub mod filter;
pub mod model;
pub mod paginate;

pub use error::EditError;
pub use filter::{DateRange, FilterState, RecordFilter};
pub use model::{
    ActiveEdit, CommittedEdit, EditKey, EditOutcome, EditState, PrivilegeGate, SensitiveColumns,
    TabularViewModel, ViewedRow,
};
pub use paginate::{clamp_page_index, paginate, total_pages, Page};
