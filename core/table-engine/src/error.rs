//! FILENAME: core/table-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The caller must obtain the elevated capability and retry.
    #[error("Privileged access required to edit '{column}'")]
    PrivilegeRequired { column: String },

    #[error("Privileged access required to add rows")]
    AddRowRequiresPrivilege,

    #[error("Row {row} is not on the current page")]
    RowOutOfRange { row: usize },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("No cell is being edited")]
    NotEditing,
}
