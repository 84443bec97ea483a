//! FILENAME: tests/common/mod.rs
//! Fixtures for table-engine integration tests.

#![allow(dead_code)]

use engine::{DashboardConfig, NotificationRecord, RecordSchema};
use table_engine::TabularViewModel;

/// A BSE feed of `count` rows with a few rows the validity filter must drop.
pub struct BseFeed {
    pub records: Vec<NotificationRecord>,
}

impl BseFeed {
    /// `totals` rows named "Total" at the front, `nils` rows with summary
    /// "NIL" right after them, the rest ordinary.
    pub fn new(count: usize, totals: usize, nils: usize) -> Self {
        let records = (0..count)
            .map(|i| {
                let entity = if i < totals {
                    "Total".to_string()
                } else {
                    format!("Entity {}", i % 40)
                };
                let summary = if i >= totals && i < totals + nils {
                    "NIL".to_string()
                } else {
                    format!("Disclosure {}", i)
                };
                NotificationRecord::from_pairs([
                    ("Name of Entity", entity),
                    ("Link to Intimation", format!("https://example.com/{}.pdf", i)),
                    ("Nature of Intimation", "Board Meeting".to_string()),
                    ("Summary of Intimation", summary),
                    ("Date", format!("{:02}-09-2025", i % 30 + 1)),
                ])
            })
            .collect();
        BseFeed { records }
    }
}

pub fn bse_model(page_size: usize, date_range_filter: bool) -> TabularViewModel {
    let config = DashboardConfig {
        page_size,
        date_range_filter,
        ..DashboardConfig::default()
    };
    TabularViewModel::from_schema(&RecordSchema::bse(), &config)
}
