//! FILENAME: core/engine/src/date.rs
//! PURPOSE: Normalizes the date encodings seen across notification feeds.
//! CONTEXT: Feeds and imported workbooks deliver dates as ISO text,
//! day-leading dash text, month-leading slash text, year-leading slash text,
//! or numeric timestamps. Everything downstream (bucketing, range filters,
//! latest-month selection) works on the `CanonicalDate` produced here.
//!
//! Dash disambiguation is a fixed heuristic: a leading 4-digit group means
//! ISO (`YYYY-MM-DD`), anything else is day-leading (`DD-MM-YYYY`).
//! `03-04-2025` is therefore always 3 April, never 4 March.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

pub const MONTH_NAMES_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const MONTH_NAMES_LONG: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// ============================================================================
// CANONICAL DATE
// ============================================================================

/// A calendar date independent of the text format it was parsed from.
/// Field order gives chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalDate {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
}

impl CanonicalDate {
    /// Returns None for impossible dates (e.g. 31 February).
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    pub fn to_naive(&self) -> NaiveDate {
        // Constructed only through validated paths
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or(NaiveDate::MIN)
    }

    /// `YYYY-MM-DD`
    pub fn day_key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn month_name_short(&self) -> &'static str {
        MONTH_NAMES_SHORT[(self.month as usize - 1) % 12]
    }

    pub fn month_name_long(&self) -> &'static str {
        MONTH_NAMES_LONG[(self.month as usize - 1) % 12]
    }

    pub fn same_month(&self, other: &CanonicalDate) -> bool {
        self.year == other.year && self.month == other.month
    }
}

impl From<NaiveDate> for CanonicalDate {
    fn from(date: NaiveDate) -> Self {
        CanonicalDate {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.day_key())
    }
}

/// Sentinel for a value that could not be read as a date.
/// Callers decide whether the row is kept; the default is to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure;

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognised date value")
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

static ISO_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ].*)?$").expect("valid regex"));
static DAY_LEADING_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").expect("valid regex"));
static MONTH_LEADING_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"));
static YEAR_LEADING_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").expect("valid regex"));

fn capture_triple(re: &Regex, text: &str) -> Option<(i64, i64, i64)> {
    let caps = re.captures(text)?;
    let a = caps.get(1)?.as_str().parse().ok()?;
    let b = caps.get(2)?.as_str().parse().ok()?;
    let c = caps.get(3)?.as_str().parse().ok()?;
    Some((a, b, c))
}

fn from_ymd(year: i64, month: i64, day: i64) -> Option<CanonicalDate> {
    let year = i32::try_from(year).ok()?;
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    CanonicalDate::new(year, month, day)
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses a textual date in any of the supported encodings.
pub fn parse_date_str(raw: &str) -> Result<CanonicalDate, ParseFailure> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ParseFailure);
    }

    if text.contains('-') && !text.contains('/') {
        if let Some((y, m, d)) = capture_triple(&ISO_DASH, text) {
            // Prefer RFC 3339 for full timestamps so offsets are honoured
            if text.len() > 10 {
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Ok(dt.date_naive().into());
                }
            }
            return from_ymd(y, m, d).ok_or(ParseFailure);
        }
        if let Some((d, m, y)) = capture_triple(&DAY_LEADING_DASH, text) {
            return from_ymd(y, m, d).ok_or(ParseFailure);
        }
        return Err(ParseFailure);
    }

    if let Some((y, m, d)) = capture_triple(&YEAR_LEADING_SLASH, text) {
        return from_ymd(y, m, d).ok_or(ParseFailure);
    }
    if let Some((m, d, y)) = capture_triple(&MONTH_LEADING_SLASH, text) {
        return from_ymd(y, m, d).ok_or(ParseFailure);
    }

    Err(ParseFailure)
}

/// Interprets a number as milliseconds since the Unix epoch (UTC).
pub fn parse_timestamp_millis(millis: f64) -> Result<CanonicalDate, ParseFailure> {
    if !millis.is_finite() {
        return Err(ParseFailure);
    }
    DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.date_naive().into())
        .ok_or(ParseFailure)
}

/// DateNormalizer entry point for a record cell.
pub fn parse_date(value: &CellValue) -> Result<CanonicalDate, ParseFailure> {
    match value {
        CellValue::Text(s) => parse_date_str(s),
        CellValue::Number(n) => parse_timestamp_millis(*n),
        CellValue::Empty => Err(ParseFailure),
    }
}
