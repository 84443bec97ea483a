//! FILENAME: core/trend-engine/src/series.rs
//! Trend Series - Chart-ready output (WHAT the charts display).
//!
//! Each point type serializes to the shape the chart components consume.
//! All series cover a contiguous domain; empty periods carry a zero count.

use serde::{Deserialize, Serialize};

// ============================================================================
// BUCKET KEYS
// ============================================================================

/// Week of month for a day-of-month: days 1-7 are week 1, 29-31 week 5.
pub fn week_of_month(day: u32) -> u32 {
    day.max(1).div_ceil(7)
}

/// `"Week N"`
pub fn week_key(week: u32) -> String {
    format!("Week {}", week)
}

/// `"Mon-YYYY"`
pub fn month_year_key(month_short: &str, year: i32) -> String {
    format!("{}-{}", month_short, year)
}

// ============================================================================
// POINTS
// ============================================================================

/// `{date, total}` for the daily trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub total: u64,
}

/// `{week, total}` for the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub total: u64,
}

/// `{month, year, total, entityLabel}` for the monthly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Short month name (`Jan`..`Dec`).
    pub month: String,
    pub year: i32,
    pub total: u64,
    pub entity_label: String,
}

impl MonthlyPoint {
    /// `"Mon-YYYY"`
    pub fn key(&self) -> String {
        month_year_key(&self.month, self.year)
    }
}

/// One slice of the entity distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPoint {
    pub entity: String,
    pub total: u64,
}

/// Generic `{bucketKey, count}` view of any point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub bucket_key: String,
    pub count: u64,
}

pub type AggregateSeries = Vec<SeriesPoint>;

pub trait BucketPoint {
    fn bucket_key(&self) -> String;
    fn count(&self) -> u64;
}

impl BucketPoint for DailyPoint {
    fn bucket_key(&self) -> String {
        self.date.clone()
    }
    fn count(&self) -> u64 {
        self.total
    }
}

impl BucketPoint for WeeklyPoint {
    fn bucket_key(&self) -> String {
        self.week.clone()
    }
    fn count(&self) -> u64 {
        self.total
    }
}

impl BucketPoint for MonthlyPoint {
    fn bucket_key(&self) -> String {
        self.key()
    }
    fn count(&self) -> u64 {
        self.total
    }
}

impl BucketPoint for EntityPoint {
    fn bucket_key(&self) -> String {
        self.entity.clone()
    }
    fn count(&self) -> u64 {
        self.total
    }
}

/// Flattens chart points into the generic series shape.
pub fn to_series<P: BucketPoint>(points: &[P]) -> AggregateSeries {
    points
        .iter()
        .map(|p| SeriesPoint {
            bucket_key: p.bucket_key(),
            count: p.count(),
        })
        .collect()
}

/// All four series computed from one record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub daily: Vec<DailyPoint>,
    pub weekly: Vec<WeeklyPoint>,
    pub monthly: Vec<MonthlyPoint>,
    pub entities: Vec<EntityPoint>,
}

impl TrendSeries {
    pub fn total_in_daily(&self) -> u64 {
        self.daily.iter().map(|p| p.total).sum()
    }
}
