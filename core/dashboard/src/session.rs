//! FILENAME: core/dashboard/src/session.rs
//! Dashboard Session - One data source wired to its table, trends and workbook bridge.
//!
//! Lifecycle:
//! 1. `begin_refresh` marks the session as loading
//! 2. The fetch result goes through `apply_load`, which always leaves the
//!    loading state: success replaces the records and recomputes trends,
//!    failure keeps whatever was loaded before
//! 3. Record writes, date range changes and imports recompute trends over
//!    the table's set. Table changes go through `update_table` so none of
//!    them can skip the recompute.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use engine::{parse_date, DashboardConfig, NotificationRecord, RecordSchema, SchemaError, SourceMapping};
use persistence::{export_filename, export_xlsx, export_xlsx_to_buffer, import_xlsx, import_xlsx_from_buffer, ImportedTable, PersistenceError};
use table_engine::{DateRange, TabularViewModel};
use trend_engine::{
    latest_date, latest_month, report_period_label, TrendAggregator, TrendDefinition, TrendSeries,
};

use crate::cache::SnapshotCache;
use crate::error::{FetchError, SessionError};
use crate::fetch::{fetch_all, FetchEnvelope, NotificationSource};

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// Nothing was ever loaded and the last attempt failed.
    Failed(String),
}

/// Result of a workbook import. Never an error: a rejected workbook leaves
/// the current records untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Replaced { rows: usize },
    Rejected { reason: String },
}

// ============================================================================
// SESSION
// ============================================================================

pub struct DashboardSession {
    /// Short source name, used as series label and cache key (e.g. "BSE")
    label: String,
    /// Table title, used for export filenames
    title: String,
    config: DashboardConfig,
    schema: RecordSchema,
    mapping: SourceMapping,
    table: TabularViewModel,
    /// Rows held out of a latest-month table. Still counted by the trends.
    earlier_rows: Vec<NotificationRecord>,
    aggregator: TrendAggregator,
    trends: TrendSeries,
    state: LoadState,
    last_error: Option<String>,
    has_loaded: bool,
    cache: SnapshotCache<Vec<NotificationRecord>>,
}

impl DashboardSession {
    pub fn new(
        label: impl Into<String>,
        title: impl Into<String>,
        schema: RecordSchema,
        mapping: SourceMapping,
        config: DashboardConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        schema.validate()?;
        mapping.validate(&schema)?;

        let label = label.into();
        let definition = TrendDefinition::from_schema(&schema, label.clone())
            .ok_or(SchemaError::MissingRole("date"))?
            .with_latest_month_only(config.latest_month_only);

        Ok(DashboardSession {
            title: title.into(),
            table: TabularViewModel::from_schema(&schema, &config),
            earlier_rows: Vec::new(),
            aggregator: TrendAggregator::new(definition),
            trends: TrendSeries::default(),
            state: LoadState::Idle,
            last_error: None,
            has_loaded: false,
            cache: SnapshotCache::new(config.cache_ttl()),
            label,
            config,
            schema,
            mapping,
        })
    }

    pub fn bse(config: DashboardConfig) -> Result<Self, SessionError> {
        Self::new("BSE", "BSE Notifications", RecordSchema::bse(), SourceMapping::bse(), config)
    }

    pub fn sebi(config: DashboardConfig) -> Result<Self, SessionError> {
        Self::new("SEBI", "SEBI Notifications", RecordSchema::sebi(), SourceMapping::sebi(), config)
    }

    pub fn rbi(config: DashboardConfig) -> Result<Self, SessionError> {
        Self::new("RBI", "RBI Notifications", RecordSchema::rbi(), SourceMapping::rbi(), config)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn table(&self) -> &TabularViewModel {
        &self.table
    }

    /// Runs `f` against the table for filtering, paging and editing. Trends
    /// are recomputed when `f` wrote records or moved the date range.
    pub fn update_table<R, F>(&mut self, today: NaiveDate, f: F) -> R
    where
        F: FnOnce(&mut TabularViewModel) -> R,
    {
        let revision = self.table.revision();
        let range = self.table.filter_state().date_range().copied();
        let result = f(&mut self.table);
        if self.table.revision() != revision || self.table.filter_state().date_range().copied() != range {
            self.recompute_trends(today);
        }
        result
    }

    pub fn trends(&self) -> &TrendSeries {
        &self.trends
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Message of the most recent failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// `"September 2025"` for the report heading.
    pub fn period_label(&self, today: NaiveDate) -> String {
        let date_column = self.schema.date_column().unwrap_or_default();
        report_period_label(self.table.records(), date_column, today)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    pub fn begin_refresh(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Applies a fetch result. On success returns the number of rows now
    /// held by the table. On failure the previous records stay in place and
    /// the error is handed back for the view to show.
    pub fn apply_load(
        &mut self,
        result: Result<FetchEnvelope, FetchError>,
        today: NaiveDate,
    ) -> Result<usize, FetchError> {
        match result {
            Ok(envelope) => {
                let rows = self.mapping.map_rows(&envelope.data);
                log::info!(
                    "[{}] fetched {} of {} rows, {} after mapping",
                    self.label,
                    envelope.data.len(),
                    envelope.count,
                    rows.len()
                );
                self.cache.put(self.label.clone(), rows.clone());
                Ok(self.install(rows, today))
            }
            Err(err) => {
                log::error!("[{}] load failed: {}", self.label, err);
                let message = err.to_string();
                self.state = if self.has_loaded {
                    LoadState::Ready
                } else {
                    LoadState::Failed(message.clone())
                };
                self.last_error = Some(message);
                Err(err)
            }
        }
    }

    fn install(&mut self, rows: Vec<NotificationRecord>, today: NaiveDate) -> usize {
        let rows = self.split_latest_month(rows);
        self.table.load(rows);
        self.recompute_trends(today);
        self.state = LoadState::Ready;
        self.last_error = None;
        self.has_loaded = true;
        self.table.records().len()
    }

    /// With `latest_month_table` set, keeps the latest month's rows for the
    /// table and parks the rest in `earlier_rows`.
    fn split_latest_month(&mut self, rows: Vec<NotificationRecord>) -> Vec<NotificationRecord> {
        self.earlier_rows.clear();
        let Some(date_column) = self.schema.date_column().filter(|_| self.config.latest_month_table) else {
            return rows;
        };
        let Some(latest) = latest_date(&rows, date_column) else {
            return rows;
        };
        let current = latest_month(&rows, date_column);
        self.earlier_rows = rows
            .into_iter()
            .filter(|r| self.table.filter().is_valid(r))
            .filter(|r| {
                !r.get(date_column)
                    .and_then(|v| parse_date(v).ok())
                    .is_some_and(|d| d.same_month(&latest))
            })
            .collect();
        log::debug!(
            "[{}] table shows {} rows of {}, {} held for trends",
            self.label,
            current.len(),
            latest.month_name_long(),
            self.earlier_rows.len()
        );
        current
    }

    /// Fetches the whole feed, each request under the configured timeout.
    pub async fn refresh<S: NotificationSource>(
        &mut self,
        source: &S,
        today: NaiveDate,
    ) -> Result<usize, FetchError> {
        self.begin_refresh();
        let result = fetch_all(source, self.config.fetch_batch_size, self.config.request_timeout()).await;
        self.apply_load(result, today)
    }

    /// Serves the cached snapshot while it is fresh, otherwise refreshes.
    pub async fn load<S: NotificationSource>(
        &mut self,
        source: &S,
        today: NaiveDate,
    ) -> Result<usize, FetchError> {
        if let Some(rows) = self.cache.get(&self.label).cloned() {
            log::debug!("[{}] serving cached snapshot", self.label);
            return Ok(self.install(rows, today));
        }
        self.refresh(source, today).await
    }

    // ------------------------------------------------------------------------
    // Trends
    // ------------------------------------------------------------------------

    /// Aggregates the table's records plus any rows held out of a
    /// latest-month table, narrowed to the selected date range.
    pub fn recompute_trends(&mut self, today: NaiveDate) {
        let mut records = self.earlier_rows.clone();
        records.extend_from_slice(self.table.records());
        if let Some(range) = self.table.filter_state().date_range() {
            records = self.table.filter().within_range(&records, range);
        }
        self.trends = self.aggregator.aggregate(&records, today);
    }

    pub fn set_date_range(&mut self, range: DateRange, today: NaiveDate) {
        self.table.set_date_range(range);
        self.recompute_trends(today);
    }

    pub fn clear_date_range(&mut self, today: NaiveDate) {
        self.table.clear_date_range();
        self.recompute_trends(today);
    }

    // ------------------------------------------------------------------------
    // Workbook bridge
    // ------------------------------------------------------------------------

    pub fn import_workbook(&mut self, path: &Path, today: NaiveDate) -> ImportOutcome {
        let result = import_xlsx(path);
        self.apply_import(result, today)
    }

    pub fn import_bytes(&mut self, bytes: &[u8], today: NaiveDate) -> ImportOutcome {
        let result = import_xlsx_from_buffer(bytes);
        self.apply_import(result, today)
    }

    fn apply_import(&mut self, result: Result<ImportedTable, PersistenceError>, today: NaiveDate) -> ImportOutcome {
        match result {
            Ok(imported) => {
                self.earlier_rows.clear();
                self.table.replace_records(imported.rows);
                self.recompute_trends(today);
                ImportOutcome::Replaced {
                    rows: self.table.records().len(),
                }
            }
            Err(err) => {
                log::error!("[{}] error reading workbook: {}", self.label, err);
                ImportOutcome::Rejected {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Writes the filtered table into `dir` and returns the file path.
    pub fn export_workbook(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf, PersistenceError> {
        let path = dir.join(export_filename(&self.title, today));
        export_xlsx(
            &self.table.filtered_snapshot(),
            self.table.columns(),
            &self.config.export_sheet_name,
            &path,
        )?;
        Ok(path)
    }

    pub fn export_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        export_xlsx_to_buffer(
            &self.table.filtered_snapshot(),
            self.table.columns(),
            &self.config.export_sheet_name,
        )
    }
}
