//! FILENAME: tests/common/mod.rs
//! Fixtures for trend-engine integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use engine::NotificationRecord;

/// BSE-shaped rows: (entity, date text).
pub struct BseFixture;

impl BseFixture {
    pub fn rows() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ACME Ltd", "2025-09-01"),
            ("ACME Ltd", "02-09-2025"),
            ("Beta Corp", "2025-09-02"),
            ("Gamma Ind", "09/15/2025"),
            ("ACME Ltd", "2025/09/29"),
            ("TOTAL", "2025-09-30"),
            ("Beta Corp", "2025-08-14"),
            ("", "2025-07-03"),
            ("Delta", "not a date"),
        ]
    }

    pub fn records() -> Vec<NotificationRecord> {
        Self::rows()
            .into_iter()
            .map(|(entity, date)| {
                NotificationRecord::from_pairs([
                    ("Name of Entity", entity),
                    ("Summary of Intimation", "Board meeting outcome"),
                    ("Date", date),
                ])
            })
            .collect()
    }
}

/// Rows carrying only a `Date` column.
pub fn dated(dates: &[&str]) -> Vec<NotificationRecord> {
    dates
        .iter()
        .map(|d| NotificationRecord::from_pairs([("Date", *d)]))
        .collect()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}
