//! FILENAME: core/trend-engine/src/definition.rs
//! Trend Definition - Serializable configuration (what a trend view IS).
//!
//! One definition replaces the per-dashboard copies of the bucketing code:
//! it names the date column, the optional entity column, and the few flags
//! that differed between the BSE, SEBI and RBI flows.

use engine::RecordSchema;
use serde::{Deserialize, Serialize};

/// Label used when a row has no entity value or the source has no entity column.
pub const UNKNOWN_ENTITY: &str = "Unknown Entity";

/// How far the monthly series extends beyond the observed months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthlySpan {
    /// Every month of every year from the earliest to the latest observed year.
    #[default]
    FullYears,
    /// Only the months from the earliest to the latest observed month.
    ObservedRange,
}

/// Configuration for a `TrendAggregator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDefinition {
    /// Column holding the notification date.
    pub date_column: String,

    /// Column holding the entity name, if the source has one.
    pub entity_column: Option<String>,

    /// Restrict the daily series to the month/year of the latest date.
    pub latest_month_only: bool,

    /// Label attached to every monthly point (e.g. "SEBI").
    pub series_label: String,

    /// Drop `TOTAL` summary rows from the entity distribution.
    pub exclude_total_entity: bool,

    #[serde(default)]
    pub monthly_span: MonthlySpan,
}

impl TrendDefinition {
    pub fn new(date_column: impl Into<String>) -> Self {
        TrendDefinition {
            date_column: date_column.into(),
            entity_column: None,
            latest_month_only: true,
            series_label: String::new(),
            exclude_total_entity: true,
            monthly_span: MonthlySpan::FullYears,
        }
    }

    /// Builds a definition from a schema's designated columns.
    /// Returns None when the schema has no date column.
    pub fn from_schema(schema: &RecordSchema, series_label: impl Into<String>) -> Option<Self> {
        let date_column = schema.date_column()?;
        Some(TrendDefinition {
            date_column: date_column.to_string(),
            entity_column: schema.entity_column().map(str::to_string),
            latest_month_only: true,
            series_label: series_label.into(),
            exclude_total_entity: true,
            monthly_span: MonthlySpan::FullYears,
        })
    }

    pub fn with_entity_column(mut self, column: impl Into<String>) -> Self {
        self.entity_column = Some(column.into());
        self
    }

    pub fn with_latest_month_only(mut self, latest_month_only: bool) -> Self {
        self.latest_month_only = latest_month_only;
        self
    }

    pub fn with_monthly_span(mut self, span: MonthlySpan) -> Self {
        self.monthly_span = span;
        self
    }

    pub fn with_series_label(mut self, label: impl Into<String>) -> Self {
        self.series_label = label.into();
        self
    }
}
