//! FILENAME: core/table-engine/src/model.rs
//! Tabular View Model - Filtered, paginated, editable view over one record set.
//!
//! The model owns the record set and all ephemeral view state: column
//! filters, the date range, the page index and the single active edit.
//! Validity rules are applied once when records enter the model; column and
//! date filters are re-applied after every change. Positions on a page are
//! resolved to source indices before any write, so edits land on the right
//! record whether or not a filter is active.

use engine::{column_union, CellValue, DashboardConfig, NotificationRecord, RecordSchema};
use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::filter::{DateRange, FilterState, RecordFilter};
use crate::paginate::{clamp_page_index, Page};

// ============================================================================
// PRIVILEGES
// ============================================================================

/// Capability query answered by the authentication collaborator.
pub trait PrivilegeGate {
    /// Whether the caller may edit the sensitive column `column`.
    fn is_privileged(&self, column: &str) -> bool;

    /// Whether the caller may append rows.
    fn may_add_rows(&self) -> bool;
}

/// A fixed answer for every query.
impl PrivilegeGate for bool {
    fn is_privileged(&self, _column: &str) -> bool {
        *self
    }

    fn may_add_rows(&self) -> bool {
        *self
    }
}

/// Columns that need the elevated capability before they can be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveColumns(Vec<String>);

impl SensitiveColumns {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SensitiveColumns(columns.into_iter().map(Into::into).collect())
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.sensitive_columns.iter().cloned())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }

    /// True when `column` is editable under `gate`.
    pub fn allows(&self, column: &str, gate: &dyn PrivilegeGate) -> bool {
        !self.contains(column) || gate.is_privileged(column)
    }
}

// ============================================================================
// EDIT STATE
// ============================================================================

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
    Other,
}

impl EditKey {
    /// Maps a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => EditKey::Enter,
            "Escape" | "Esc" => EditKey::Escape,
            _ => EditKey::Other,
        }
    }
}

/// The cell being edited and its uncommitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEdit {
    /// Position in the filtered view, `(page - 1) * size + row`
    pub position: usize,
    /// Index of the record in the underlying set
    pub source_index: usize,
    pub column: String,
    pub draft: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Viewing,
    Editing(ActiveEdit),
}

impl EditState {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing(_))
    }

    pub fn active(&self) -> Option<&ActiveEdit> {
        match self {
            EditState::Editing(edit) => Some(edit),
            EditState::Viewing => None,
        }
    }
}

/// A write applied to the underlying set.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEdit {
    pub source_index: usize,
    pub column: String,
    pub previous: CellValue,
    pub value: CellValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Committed(CommittedEdit),
    Cancelled,
    /// No edit was active, or the key has no meaning to the editor.
    Ignored,
}

/// Row handed to the `onViewRow(row, absoluteIndex)` callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewedRow<'a> {
    pub record: &'a NotificationRecord,
    /// Position in the filtered view
    pub absolute_index: usize,
    pub source_index: usize,
}

// ============================================================================
// VIEW MODEL
// ============================================================================

#[derive(Debug, Clone)]
pub struct TabularViewModel {
    records: Vec<NotificationRecord>,
    columns: Vec<String>,
    filter: RecordFilter,
    filters: FilterState,
    /// Source indices passing the column and date filters, in source order
    visible: Vec<usize>,
    page_size: usize,
    page_index: usize,
    edit: EditState,
    sensitive: SensitiveColumns,
    /// Bumped on every write to the record set
    revision: u64,
}

impl TabularViewModel {
    pub fn new(
        columns: Vec<String>,
        filter: RecordFilter,
        page_size: usize,
        sensitive: SensitiveColumns,
    ) -> Self {
        TabularViewModel {
            records: Vec::new(),
            columns,
            filter,
            filters: FilterState::new(),
            visible: Vec::new(),
            page_size,
            page_index: 1,
            edit: EditState::Viewing,
            sensitive,
            revision: 0,
        }
    }

    /// Columns, validity rules and date column from the schema; page size,
    /// date-range switch and sensitive columns from the config.
    pub fn from_schema(schema: &RecordSchema, config: &DashboardConfig) -> Self {
        let filter = RecordFilter::from_schema(schema).with_date_range_enabled(config.date_range_filter);
        Self::new(
            schema.column_names(),
            filter,
            config.page_size,
            SensitiveColumns::from_config(config),
        )
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn sensitive_columns(&self) -> &SensitiveColumns {
        &self.sensitive
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Changes whenever records are loaded, replaced, edited or added.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------------

    /// Replaces the record set after a fetch and resets all view state.
    pub fn load(&mut self, records: Vec<NotificationRecord>) {
        self.discard_edit();
        self.filters = FilterState::new();
        self.page_index = 1;
        self.records = self.admit(records);
        self.revision += 1;
        if self.columns.is_empty() {
            self.columns = column_union(&self.records);
        }
        self.refilter();
        log::info!(
            "[TABLE] loaded {} records, {} visible",
            self.records.len(),
            self.visible.len()
        );
    }

    /// Replaces the record set with imported rows. Filters stay; columns the
    /// import introduces are appended after the known ones.
    pub fn replace_records(&mut self, records: Vec<NotificationRecord>) {
        self.discard_edit();
        self.records = self.admit(records);
        self.revision += 1;
        for column in column_union(&self.records) {
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        self.refilter();
        self.page_index = clamp_page_index(self.page_index, self.visible.len(), self.page_size);
        log::info!("[TABLE] replaced record set with {} rows", self.records.len());
    }

    /// Fills an empty set with `count` blank rows so there is something to type into.
    pub fn seed_blank_rows(&mut self, count: usize) {
        if !self.records.is_empty() {
            return;
        }
        self.records = (0..count).map(|_| NotificationRecord::blank(&self.columns)).collect();
        self.revision += 1;
        self.refilter();
    }

    fn admit(&self, records: Vec<NotificationRecord>) -> Vec<NotificationRecord> {
        let total = records.len();
        let admitted: Vec<NotificationRecord> =
            records.into_iter().filter(|r| self.filter.is_valid(r)).collect();
        if admitted.len() < total {
            log::debug!("[TABLE] validity filter dropped {} of {} rows", total - admitted.len(), total);
        }
        admitted
    }

    /// Validity was settled on entry; only the user filters are re-run.
    fn refilter(&mut self) {
        self.visible = self.filter.select(&self.records, &self.filters);
    }

    // ------------------------------------------------------------------------
    // Filters (every change returns to page 1)
    // ------------------------------------------------------------------------

    pub fn set_filter(&mut self, column: &str, pattern: &str) {
        self.blur();
        self.filters.set_column(column, pattern);
        self.after_filter_change();
    }

    pub fn clear_filters(&mut self) {
        self.blur();
        self.filters.clear();
        self.after_filter_change();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.blur();
        self.filters.set_date_range(range);
        self.after_filter_change();
    }

    pub fn clear_date_range(&mut self) {
        self.blur();
        self.filters.clear_date_range();
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        self.refilter();
        self.page_index = 1;
    }

    // ------------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------------

    pub fn page(&self) -> Page {
        Page::new(self.page_index, self.page_size, self.visible.len())
    }

    /// Moves to `index`, clamped to the available pages. Returns the new index.
    pub fn set_page(&mut self, index: usize) -> usize {
        self.blur();
        self.page_index = clamp_page_index(index, self.visible.len(), self.page_size);
        self.page_index
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.page_index + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.page_index.saturating_sub(1))
    }

    /// Source indices of the rows on the current page.
    pub fn page_source_indices(&self) -> &[usize] {
        &self.visible[self.page().range()]
    }

    pub fn page_rows(&self) -> Vec<&NotificationRecord> {
        self.page_source_indices().iter().map(|&i| &self.records[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn filtered_records(&self) -> Vec<&NotificationRecord> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    /// Owned copy of the filtered set, for export.
    pub fn filtered_snapshot(&self) -> Vec<NotificationRecord> {
        self.visible.iter().map(|&i| self.records[i].clone()).collect()
    }

    /// Source index of page-local `row`.
    pub fn source_index(&self, row: usize) -> Option<usize> {
        let page = self.page();
        page.absolute_index(row).map(|position| self.visible[position])
    }

    pub fn view_row(&self, row: usize) -> Option<ViewedRow<'_>> {
        let absolute_index = self.page().absolute_index(row)?;
        let source_index = self.visible[absolute_index];
        Some(ViewedRow {
            record: &self.records[source_index],
            absolute_index,
            source_index,
        })
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    /// Starts editing page-local `row` in `column`. Any edit already in
    /// progress is committed first, as if its input had lost focus.
    pub fn begin_edit(
        &mut self,
        row: usize,
        column: &str,
        gate: &dyn PrivilegeGate,
    ) -> Result<Option<CommittedEdit>, EditError> {
        let previous = self.blur();

        if !self.columns.iter().any(|c| c == column) {
            return Err(EditError::UnknownColumn(column.to_string()));
        }
        if !self.sensitive.allows(column, gate) {
            log::warn!("[TABLE] edit of sensitive column '{}' needs privilege", column);
            return Err(EditError::PrivilegeRequired {
                column: column.to_string(),
            });
        }
        let position = self
            .page()
            .absolute_index(row)
            .ok_or(EditError::RowOutOfRange { row })?;
        let source_index = self.visible[position];

        self.edit = EditState::Editing(ActiveEdit {
            position,
            source_index,
            column: column.to_string(),
            draft: self.records[source_index].display(column),
        });
        Ok(previous)
    }

    pub fn update_draft(&mut self, text: &str) -> Result<(), EditError> {
        match &mut self.edit {
            EditState::Editing(edit) => {
                edit.draft = text.to_string();
                Ok(())
            }
            EditState::Viewing => Err(EditError::NotEditing),
        }
    }

    pub fn handle_key(&mut self, key: EditKey) -> EditOutcome {
        match key {
            EditKey::Enter => self.commit_edit().map_or(EditOutcome::Ignored, EditOutcome::Committed),
            EditKey::Escape if self.cancel_edit() => EditOutcome::Cancelled,
            _ => EditOutcome::Ignored,
        }
    }

    /// Focus left the editor: commits.
    pub fn blur(&mut self) -> Option<CommittedEdit> {
        self.commit_edit()
    }

    /// Writes the draft into the underlying record as text.
    pub fn commit_edit(&mut self) -> Option<CommittedEdit> {
        let EditState::Editing(edit) = std::mem::take(&mut self.edit) else {
            return None;
        };
        let record = self.records.get_mut(edit.source_index)?;
        let previous = record.get(&edit.column).cloned().unwrap_or_default();
        let value = CellValue::Text(edit.draft);
        record.set(edit.column.as_str(), value.clone());
        self.revision += 1;

        self.refilter();
        self.page_index = clamp_page_index(self.page_index, self.visible.len(), self.page_size);

        Some(CommittedEdit {
            source_index: edit.source_index,
            column: edit.column,
            previous,
            value,
        })
    }

    /// Discards the draft. Returns false when nothing was being edited.
    pub fn cancel_edit(&mut self) -> bool {
        self.discard_edit()
    }

    fn discard_edit(&mut self) -> bool {
        match std::mem::take(&mut self.edit) {
            EditState::Editing(edit) => {
                log::debug!(
                    "[TABLE] discarded draft for row {} column '{}'",
                    edit.source_index,
                    edit.column
                );
                true
            }
            EditState::Viewing => false,
        }
    }

    /// Appends a row with every known column set to empty text.
    /// Returns its source index.
    pub fn add_row(&mut self, gate: &dyn PrivilegeGate) -> Result<usize, EditError> {
        if !gate.may_add_rows() {
            log::warn!("[TABLE] add row needs privilege");
            return Err(EditError::AddRowRequiresPrivilege);
        }
        self.blur();
        self.records.push(NotificationRecord::blank(&self.columns));
        self.revision += 1;
        self.refilter();
        Ok(self.records.len() - 1)
    }
}
