//! FILENAME: tests/common/mod.rs
//! Fakes for the network and authentication collaborators.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use dashboard::{Authenticator, Credentials, FetchEnvelope, FetchError, NotificationSource};
use engine::NotificationRecord;

/// Serves a fixed raw feed page by page.
pub struct FakeSource {
    pub rows: Vec<NotificationRecord>,
    pub delay: Option<Duration>,
    pub fail_with_status: Option<u16>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(rows: Vec<NotificationRecord>) -> Self {
        FakeSource {
            rows,
            delay: None,
            fail_with_status: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NotificationSource for FakeSource {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<FetchEnvelope, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.fail_with_status {
            return Err(FetchError::Http {
                status,
                message: format!("Failed to fetch BSE alerts data: {}", status),
            });
        }
        let end = (offset + limit).min(self.rows.len());
        let data = self.rows.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        Ok(FetchEnvelope {
            data,
            count: self.rows.len(),
        })
    }
}

/// Raw BSE API rows: `entity_name`, `pdf_link`, `nature`, `summary`, `date_key`.
pub fn raw_bse_rows(count: usize) -> Vec<NotificationRecord> {
    (0..count)
        .map(|i| {
            let entity = match i % 50 {
                0 => "TOTAL".to_string(),
                7 => String::new(),
                n => format!("Company {}", n % 5),
            };
            NotificationRecord::from_pairs([
                ("entity_name", entity),
                ("pdf_link", format!("https://example.com/{}.pdf", i)),
                ("nature", if i % 3 == 0 { String::new() } else { "Outcome".to_string() }),
                ("summary", format!("Announcement {}", i)),
                ("date_key", format!("{:02}-09-2025", i % 30 + 1)),
            ])
        })
        .collect()
}

pub struct FakeAuth {
    pub privileged: bool,
}

impl Authenticator for FakeAuth {
    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn authenticate(&mut self, credentials: &Credentials) -> bool {
        self.privileged = credentials.username == "admin" && credentials.password == "s3cret";
        self.privileged
    }

    fn logout(&mut self) {
        self.privileged = false;
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}
