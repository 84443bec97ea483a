//! FILENAME: core/trend-engine/src/period.rs
//! Period helpers - latest-month selection and report period labels.

use chrono::NaiveDate;
use engine::{parse_date, CanonicalDate, NotificationRecord};

/// The maximum parseable date in `column`, if any.
pub fn latest_date(records: &[NotificationRecord], column: &str) -> Option<CanonicalDate> {
    records
        .iter()
        .filter_map(|r| r.get(column))
        .filter_map(|v| parse_date(v).ok())
        .max()
}

/// Records from the month/year of the latest date.
///
/// Rows whose date does not parse are dropped. When no date parses at all,
/// the input is returned unchanged.
pub fn latest_month(records: &[NotificationRecord], column: &str) -> Vec<NotificationRecord> {
    let Some(latest) = latest_date(records, column) else {
        return records.to_vec();
    };

    records
        .iter()
        .filter(|r| {
            r.get(column)
                .and_then(|v| parse_date(v).ok())
                .is_some_and(|d| d.same_month(&latest))
        })
        .cloned()
        .collect()
}

/// Heading such as `"September 2025"`, taken from the first row's date.
/// Falls back to the month of `today` when the first row has no usable date.
pub fn report_period_label(records: &[NotificationRecord], column: &str, today: NaiveDate) -> String {
    let date = records
        .first()
        .and_then(|r| r.get(column))
        .and_then(|v| parse_date(v).ok())
        .unwrap_or_else(|| CanonicalDate::from(today));
    format!("{} {}", date.month_name_long(), date.year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str) -> NotificationRecord {
        NotificationRecord::from_pairs([("Date", date)])
    }

    #[test]
    fn latest_month_keeps_only_that_month() {
        let records = vec![rec("2025-08-31"), rec("01-09-2025"), rec("garbage"), rec("09/15/2025")];
        let latest = latest_month(&records, "Date");
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].display("Date"), "01-09-2025");
    }

    #[test]
    fn latest_month_without_dates_is_identity() {
        let records = vec![rec("n/a"), rec("")];
        assert_eq!(latest_month(&records, "Date"), records);
    }

    #[test]
    fn period_label_uses_first_row_or_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(report_period_label(&[rec("2025-09-03")], "Date", today), "September 2025");
        assert_eq!(report_period_label(&[rec("???")], "Date", today), "October 2026");
        assert_eq!(report_period_label(&[], "Date", today), "October 2026");
    }
}
