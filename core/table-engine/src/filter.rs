//! FILENAME: core/table-engine/src/filter.rs
//! Record Filter - Validity rules, column filters and the date range.
//!
//! Filtering runs in three stages and never reorders:
//! 1. Validity (always on): drop blank rows, `TOTAL` entity rows and NIL summaries
//! 2. Per-column case-insensitive substring filters
//! 3. Inclusive date range, when enabled and a date column exists
//!
//! The result is a list of indices into the source set, so callers can map
//! a position in the filtered view back to the record it came from.

use chrono::NaiveDate;
use engine::{parse_date, CanonicalDate, NotificationRecord, RecordSchema};
use serde::{Deserialize, Serialize};

/// Summary values that mark a placeholder row.
const NIL_SUMMARIES: [&str; 3] = ["NIL", "NILL", "NULL"];

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive calendar range. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange { from, to }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange { from: Some(from), to: Some(to) }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// `from` counts from start of day and `to` through end of day, which at
    /// day resolution is an inclusive comparison on both ends.
    pub fn contains(&self, date: &CanonicalDate) -> bool {
        let day = date.to_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    /// Picker caption: `"Sep 01 - Sep 30"`, `"From Sep 01"`, `"To Sep 30"`.
    pub fn label(&self) -> String {
        let fmt = |d: NaiveDate| d.format("%b %d").to_string();
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!("{} - {}", fmt(from), fmt(to)),
            (Some(from), None) => format!("From {}", fmt(from)),
            (None, Some(to)) => format!("To {}", fmt(to)),
            (None, None) => "Select date range".to_string(),
        }
    }
}

// ============================================================================
// FILTER STATE
// ============================================================================

/// User-entered filters: one substring pattern per column plus a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// (column, pattern) in the order the filters were first set
    columns: Vec<(String, String)>,
    date_range: Option<DateRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces the pattern for `column`. An empty pattern deactivates it.
    pub fn set_column(&mut self, column: impl Into<String>, pattern: impl Into<String>) {
        let column = column.into();
        let pattern = pattern.into();
        match self.columns.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = pattern,
            None => self.columns.push((column, pattern)),
        }
    }

    pub fn pattern(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, p)| p.as_str())
    }

    /// Active (non-empty) column filters.
    pub fn active_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(c, p)| (c.as_str(), p.as_str()))
    }

    /// Removes every column filter. The date range is kept.
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = if range.is_open() { None } else { Some(range) };
    }

    pub fn clear_date_range(&mut self) {
        self.date_range = None;
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active_columns().next().is_some() || self.date_range.is_some()
    }
}

// ============================================================================
// RECORD FILTER
// ============================================================================

/// Applies validity rules, column filters and the date range to a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    entity_column: Option<String>,
    summary_column: Option<String>,
    date_column: Option<String>,
    date_range_enabled: bool,
}

impl RecordFilter {
    /// Validity rules and date column taken from the schema's designated columns.
    pub fn from_schema(schema: &RecordSchema) -> Self {
        RecordFilter {
            entity_column: schema.entity_column().map(str::to_string),
            summary_column: schema.summary_column().map(str::to_string),
            date_column: schema.date_column().map(str::to_string),
            date_range_enabled: false,
        }
    }

    pub fn with_date_range_enabled(mut self, enabled: bool) -> Self {
        self.date_range_enabled = enabled;
        self
    }

    pub fn date_range_enabled(&self) -> bool {
        self.date_range_enabled
    }

    pub fn date_column(&self) -> Option<&str> {
        self.date_column.as_deref()
    }

    /// Always-on admission rule.
    pub fn is_valid(&self, record: &NotificationRecord) -> bool {
        if record.values().all(|v| v.is_blank()) {
            return false;
        }

        let column_text = |column: &Option<String>| {
            column
                .as_deref()
                .and_then(|c| record.get(c))
                .map(|v| v.display_value().trim().to_ascii_uppercase())
        };

        if column_text(&self.entity_column).is_some_and(|e| e == "TOTAL") {
            return false;
        }
        if column_text(&self.summary_column).is_some_and(|s| NIL_SUMMARIES.contains(&s.as_str())) {
            return false;
        }
        true
    }

    /// Case-insensitive substring match for every active column filter.
    /// A missing cell reads as empty text.
    pub fn matches_columns(&self, record: &NotificationRecord, state: &FilterState) -> bool {
        state.active_columns().all(|(column, pattern)| {
            record
                .display(column)
                .to_lowercase()
                .contains(&pattern.to_lowercase())
        })
    }

    /// Whether `record` falls inside `range`. Rows without a parseable date
    /// are kept.
    pub fn matches_date_range(&self, record: &NotificationRecord, range: &DateRange) -> bool {
        let Some(column) = self.date_column.as_deref() else {
            return true;
        };
        match record.get(column).map(parse_date) {
            Some(Ok(date)) => range.contains(&date),
            _ => true,
        }
    }

    /// Source indices of the records that pass every stage, in source order.
    pub fn apply(&self, records: &[NotificationRecord], state: &FilterState) -> Vec<usize> {
        self.indices_where(records, state, |r| self.is_valid(r))
    }

    /// Stages 2 and 3 only. For record sets that were admitted through the
    /// validity stage already.
    pub fn select(&self, records: &[NotificationRecord], state: &FilterState) -> Vec<usize> {
        self.indices_where(records, state, |_| true)
    }

    fn indices_where<F>(&self, records: &[NotificationRecord], state: &FilterState, admit: F) -> Vec<usize>
    where
        F: Fn(&NotificationRecord) -> bool,
    {
        let range = state
            .date_range()
            .filter(|_| self.date_range_enabled && self.date_column.is_some());

        records
            .iter()
            .enumerate()
            .filter(|(_, r)| admit(r))
            .filter(|(_, r)| self.matches_columns(r, state))
            .filter(|(_, r)| range.map_or(true, |range| self.matches_date_range(r, range)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Valid records inside `range`, ignoring column filters and the enable flag.
    /// Used to narrow chart input to the selected period.
    pub fn within_range(&self, records: &[NotificationRecord], range: &DateRange) -> Vec<NotificationRecord> {
        records
            .iter()
            .filter(|r| self.is_valid(r) && self.matches_date_range(r, range))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::CellValue;

    fn bse_row(entity: &str, summary: &str, date: &str) -> NotificationRecord {
        NotificationRecord::from_pairs([
            ("Name of Entity", entity),
            ("Summary of Intimation", summary),
            ("Date", date),
        ])
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validity_rejects_total_nil_and_blank_rows() {
        let filter = RecordFilter::from_schema(&RecordSchema::bse());
        assert!(filter.is_valid(&bse_row("ACME", "Board meeting", "2025-09-01")));
        assert!(!filter.is_valid(&bse_row("total", "Board meeting", "2025-09-01")));
        assert!(!filter.is_valid(&bse_row(" Total ", "x", "")));
        assert!(!filter.is_valid(&bse_row("ACME", "Nil", "2025-09-01")));
        assert!(!filter.is_valid(&bse_row("ACME", "nill", "2025-09-01")));
        assert!(!filter.is_valid(&bse_row("ACME", "NULL", "2025-09-01")));
        assert!(!filter.is_valid(&bse_row("", "null", "undefined")));
        assert!(!filter.is_valid(&NotificationRecord::new()));
        // Substrings of the markers are fine
        assert!(filter.is_valid(&bse_row("Totality Ltd", "Nil return filed", "")));
    }

    #[test]
    fn schema_without_entity_only_checks_summary() {
        let filter = RecordFilter::from_schema(&RecordSchema::sebi());
        let row = NotificationRecord::from_pairs([("Date", "2025-09-01"), ("Summary", "TOTAL")]);
        assert!(filter.is_valid(&row));
        let nil = NotificationRecord::from_pairs([("Date", "2025-09-01"), ("Summary", "nil")]);
        assert!(!filter.is_valid(&nil));
    }

    #[test]
    fn column_filters_are_case_insensitive_substrings() {
        let filter = RecordFilter::from_schema(&RecordSchema::bse());
        let records = vec![
            bse_row("ACME Ltd", "Board Meeting", "2025-09-01"),
            bse_row("Beta", "Dividend", "2025-09-02"),
            bse_row("acme holdings", "Dividend", "2025-09-03"),
        ];
        let mut state = FilterState::new();
        state.set_column("Name of Entity", "AcMe");
        assert_eq!(filter.apply(&records, &state), vec![0, 2]);

        state.set_column("Summary of Intimation", "divi");
        assert_eq!(filter.apply(&records, &state), vec![2]);

        state.set_column("Name of Entity", "");
        assert_eq!(filter.apply(&records, &state), vec![1, 2]);
    }

    #[test]
    fn numeric_cells_match_their_display_text() {
        let filter = RecordFilter::default();
        let records = vec![NotificationRecord::from_pairs([("Count", CellValue::Number(42.0))])];
        let mut state = FilterState::new();
        state.set_column("Count", "42");
        assert_eq!(filter.apply(&records, &state), vec![0]);
        state.set_column("Count", "42.0");
        assert!(filter.apply(&records, &state).is_empty());
    }

    #[test]
    fn date_range_inclusive_and_keeps_unparseable() {
        let filter = RecordFilter::from_schema(&RecordSchema::bse()).with_date_range_enabled(true);
        let records = vec![
            bse_row("A", "s", "2025-08-31"),
            bse_row("B", "s", "01-09-2025"),
            bse_row("C", "s", "09/15/2025"),
            bse_row("D", "s", "2025-09-30"),
            bse_row("E", "s", "2025-10-01"),
            bse_row("F", "s", "soon"),
        ];
        let mut state = FilterState::new();
        state.set_date_range(DateRange::between(day(2025, 9, 1), day(2025, 9, 30)));
        assert_eq!(filter.apply(&records, &state), vec![1, 2, 3, 5]);

        state.set_date_range(DateRange::new(Some(day(2025, 9, 30)), None));
        assert_eq!(filter.apply(&records, &state), vec![3, 4, 5]);

        state.set_date_range(DateRange::new(None, Some(day(2025, 8, 31))));
        assert_eq!(filter.apply(&records, &state), vec![0, 5]);
    }

    #[test]
    fn date_range_ignored_when_disabled() {
        let filter = RecordFilter::from_schema(&RecordSchema::bse());
        let records = vec![bse_row("A", "s", "2025-08-31"), bse_row("B", "s", "2025-09-01")];
        let mut state = FilterState::new();
        state.set_date_range(DateRange::between(day(2025, 9, 1), day(2025, 9, 1)));
        assert_eq!(filter.apply(&records, &state), vec![0, 1]);
        assert_eq!(filter.within_range(&records, state.date_range().unwrap()).len(), 1);
    }

    #[test]
    fn filtering_twice_is_the_same_as_once() {
        let filter = RecordFilter::from_schema(&RecordSchema::bse()).with_date_range_enabled(true);
        let records = vec![
            bse_row("ACME", "Dividend", "2025-09-01"),
            bse_row("TOTAL", "Dividend", "2025-09-02"),
            bse_row("Beta", "Dividend", "2025-10-02"),
            bse_row("acme", "NIL", "2025-09-03"),
        ];
        let mut state = FilterState::new();
        state.set_column("Summary of Intimation", "div");
        state.set_date_range(DateRange::between(day(2025, 9, 1), day(2025, 9, 30)));

        let once: Vec<NotificationRecord> = filter
            .apply(&records, &state)
            .into_iter()
            .map(|i| records[i].clone())
            .collect();
        let twice: Vec<usize> = filter.apply(&once, &state);
        assert_eq!(twice, (0..once.len()).collect::<Vec<_>>());
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn filter_state_activity() {
        let mut state = FilterState::new();
        assert!(!state.is_active());
        state.set_column("Date", "");
        assert!(!state.is_active());
        state.set_date_range(DateRange::default());
        assert!(state.date_range().is_none());
        state.set_date_range(DateRange::new(Some(day(2025, 1, 1)), None));
        assert!(state.is_active());
        state.clear();
        assert!(state.is_active());
        state.clear_date_range();
        assert!(!state.is_active());
    }

    #[test]
    fn date_range_labels() {
        assert_eq!(DateRange::default().label(), "Select date range");
        assert_eq!(DateRange::between(day(2025, 9, 1), day(2025, 9, 30)).label(), "Sep 01 - Sep 30");
        assert_eq!(DateRange::new(Some(day(2025, 9, 1)), None).label(), "From Sep 01");
        assert_eq!(DateRange::new(None, Some(day(2025, 9, 30))).label(), "To Sep 30");
    }

    #[test]
    fn select_skips_validity_but_not_user_filters() {
        let filter = RecordFilter::from_schema(&RecordSchema::bse()).with_date_range_enabled(true);
        let records = vec![
            bse_row("TOTAL", "Dividend", "2025-09-01"),
            bse_row("ACME", "Dividend", "2025-10-01"),
            bse_row("Beta", "Buyback", "2025-09-02"),
        ];
        let mut state = FilterState::new();
        state.set_column("Summary of Intimation", "div");
        assert_eq!(filter.select(&records, &state), vec![0, 1]);
        assert_eq!(filter.apply(&records, &state), vec![1]);

        state.set_date_range(DateRange::between(day(2025, 9, 1), day(2025, 9, 30)));
        assert_eq!(filter.select(&records, &state), vec![0]);
    }

    #[test]
    fn filter_state_survives_json() {
        let mut state = FilterState::new();
        state.set_column("Name of Entity", "acme");
        state.set_date_range(DateRange::new(Some(day(2025, 9, 1)), None));

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""dateRange":{"from":"2025-09-01","to":null}"#));
        let back: FilterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
