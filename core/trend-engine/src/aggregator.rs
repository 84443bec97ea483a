//! FILENAME: core/trend-engine/src/aggregator.rs
//! Trend Aggregator - The bucketing core that turns records into chart series.
//!
//! Algorithm:
//! 1. Parse the designated date column of every record (unparseable dates
//!    are skipped for time buckets but still count toward entities)
//! 2. Count per calendar day
//! 3. Derive daily (optionally latest month only), weekly (latest month),
//!    and monthly (whole observed year range) series from the day counts
//! 4. Zero-fill every series so its domain is contiguous

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use engine::{parse_date, CanonicalDate, NotificationRecord, MONTH_NAMES_SHORT};
use rustc_hash::FxHashMap;

use crate::definition::{MonthlySpan, TrendDefinition, UNKNOWN_ENTITY};
use crate::series::{
    week_key, week_of_month, DailyPoint, EntityPoint, MonthlyPoint, TrendSeries, WeeklyPoint,
};

// ============================================================================
// CALENDAR HELPERS
// ============================================================================

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

// ============================================================================
// TREND AGGREGATOR
// ============================================================================

/// Computes chart series for one `TrendDefinition`.
#[derive(Debug, Clone)]
pub struct TrendAggregator {
    definition: TrendDefinition,
}

impl TrendAggregator {
    pub fn new(definition: TrendDefinition) -> Self {
        TrendAggregator { definition }
    }

    pub fn definition(&self) -> &TrendDefinition {
        &self.definition
    }

    fn record_date(&self, record: &NotificationRecord) -> Option<CanonicalDate> {
        record
            .get(&self.definition.date_column)
            .and_then(|value| parse_date(value).ok())
    }

    /// Counts per calendar day, in chronological order.
    pub fn day_counts(&self, records: &[NotificationRecord]) -> BTreeMap<CanonicalDate, u64> {
        let mut counts = BTreeMap::new();
        for date in records.iter().filter_map(|r| self.record_date(r)) {
            *counts.entry(date).or_insert(0) += 1;
        }
        counts
    }

    /// Daily series, zero-filled between its first and last day.
    pub fn daily(&self, records: &[NotificationRecord]) -> Vec<DailyPoint> {
        daily_from_counts(&self.day_counts(records), self.definition.latest_month_only)
    }

    /// Weekly series for the latest month: `Week 1` through the last week of that month.
    pub fn weekly(&self, records: &[NotificationRecord]) -> Vec<WeeklyPoint> {
        weekly_from_counts(&self.day_counts(records))
    }

    /// Monthly series, by default spanning every month of every observed year.
    /// With no parseable dates, yields twelve zero months of `today`'s year.
    pub fn monthly(&self, records: &[NotificationRecord], today: NaiveDate) -> Vec<MonthlyPoint> {
        monthly_from_counts(&self.day_counts(records), &self.definition, today)
    }

    /// Occurrences per entity, most frequent first.
    pub fn entity_distribution(&self, records: &[NotificationRecord]) -> Vec<EntityPoint> {
        let mut counts: FxHashMap<String, u64> = FxHashMap::default();

        for record in records {
            let label = self
                .definition
                .entity_column
                .as_deref()
                .and_then(|column| record.get(column))
                .filter(|value| !value.is_blank())
                .map(|value| value.display_value().trim().to_string())
                .unwrap_or_else(|| UNKNOWN_ENTITY.to_string());

            if self.definition.exclude_total_entity && label.eq_ignore_ascii_case("TOTAL") {
                continue;
            }
            *counts.entry(label).or_insert(0) += 1;
        }

        let mut points: Vec<EntityPoint> = counts
            .into_iter()
            .map(|(entity, total)| EntityPoint { entity, total })
            .collect();
        // Ties broken by label so output does not depend on hash order
        points.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.entity.cmp(&b.entity)));
        points
    }

    /// All series at once, sharing a single date-parsing pass.
    pub fn aggregate(&self, records: &[NotificationRecord], today: NaiveDate) -> TrendSeries {
        let counts = self.day_counts(records);
        TrendSeries {
            daily: daily_from_counts(&counts, self.definition.latest_month_only),
            weekly: weekly_from_counts(&counts),
            monthly: monthly_from_counts(&counts, &self.definition, today),
            entities: self.entity_distribution(records),
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS (operate on pre-computed day counts)
// ============================================================================

fn latest_day(counts: &BTreeMap<CanonicalDate, u64>) -> Option<CanonicalDate> {
    counts.keys().next_back().copied()
}

fn daily_from_counts(counts: &BTreeMap<CanonicalDate, u64>, latest_month_only: bool) -> Vec<DailyPoint> {
    let Some(latest) = latest_day(counts) else {
        return Vec::new();
    };

    let window: Vec<(&CanonicalDate, &u64)> = counts
        .iter()
        .filter(|(date, _)| !latest_month_only || date.same_month(&latest))
        .collect();

    let (Some((first, _)), Some((last, _))) = (window.first(), window.last()) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut day = first.to_naive();
    let end = last.to_naive();
    while day <= end {
        let key = CanonicalDate::from(day);
        points.push(DailyPoint {
            date: key.day_key(),
            total: counts.get(&key).copied().unwrap_or(0),
        });
        day += Duration::days(1);
    }
    points
}

fn weekly_from_counts(counts: &BTreeMap<CanonicalDate, u64>) -> Vec<WeeklyPoint> {
    let Some(latest) = latest_day(counts) else {
        return Vec::new();
    };

    let week_count = week_of_month(days_in_month(latest.year, latest.month));
    let mut totals = vec![0u64; week_count as usize];
    for (date, count) in counts.iter().filter(|(date, _)| date.same_month(&latest)) {
        let week = week_of_month(date.day) as usize;
        totals[week - 1] += count;
    }

    totals
        .into_iter()
        .enumerate()
        .map(|(i, total)| WeeklyPoint {
            week: week_key(i as u32 + 1),
            total,
        })
        .collect()
}

fn monthly_from_counts(
    counts: &BTreeMap<CanonicalDate, u64>,
    definition: &TrendDefinition,
    today: NaiveDate,
) -> Vec<MonthlyPoint> {
    let mut by_month: FxHashMap<(i32, u32), u64> = FxHashMap::default();
    for (date, count) in counts {
        *by_month.entry((date.year, date.month)).or_insert(0) += count;
    }

    // (year, month) bounds, inclusive
    let (start, end) = match (counts.keys().next(), counts.keys().next_back()) {
        (Some(first), Some(last)) => match definition.monthly_span {
            MonthlySpan::FullYears => ((first.year, 1), (last.year, 12)),
            MonthlySpan::ObservedRange => ((first.year, first.month), (last.year, last.month)),
        },
        _ => ((today.year(), 1), (today.year(), 12)),
    };

    let mut points = Vec::new();
    let (mut year, mut month) = start;
    while (year, month) <= end {
        points.push(MonthlyPoint {
            month: MONTH_NAMES_SHORT[month as usize - 1].to_string(),
            year,
            total: by_month.get(&(year, month)).copied().unwrap_or(0),
            entity_label: definition.series_label.clone(),
        });
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str) -> NotificationRecord {
        NotificationRecord::from_pairs([("Date", date)])
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 9), 30);
    }

    #[test]
    fn daily_restricted_to_latest_month_and_gap_filled() {
        let records = vec![rec("2025-08-30"), rec("2025-09-01"), rec("03-09-2025"), rec("2025-09-03")];
        let agg = TrendAggregator::new(TrendDefinition::new("Date"));
        let daily = agg.daily(&records);
        assert_eq!(
            daily,
            vec![
                DailyPoint { date: "2025-09-01".into(), total: 1 },
                DailyPoint { date: "2025-09-02".into(), total: 0 },
                DailyPoint { date: "2025-09-03".into(), total: 2 },
            ]
        );
    }

    #[test]
    fn daily_full_range_when_not_latest_only() {
        let records = vec![rec("2025-08-30"), rec("2025-09-01")];
        let agg = TrendAggregator::new(TrendDefinition::new("Date").with_latest_month_only(false));
        let daily = agg.daily(&records);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].date, "2025-08-30");
        assert_eq!(daily[1].total, 0);
    }

    #[test]
    fn weekly_covers_whole_latest_month() {
        let records = vec![rec("2025-09-07"), rec("2025-09-08"), rec("2025-09-29"), rec("2025-08-01")];
        let agg = TrendAggregator::new(TrendDefinition::new("Date"));
        let weekly = agg.weekly(&records);
        let totals: Vec<(String, u64)> = weekly.into_iter().map(|w| (w.week, w.total)).collect();
        assert_eq!(
            totals,
            vec![
                ("Week 1".to_string(), 1),
                ("Week 2".to_string(), 1),
                ("Week 3".to_string(), 0),
                ("Week 4".to_string(), 0),
                ("Week 5".to_string(), 1),
            ]
        );
    }

    #[test]
    fn weekly_february_has_four_weeks() {
        let agg = TrendAggregator::new(TrendDefinition::new("Date"));
        assert_eq!(agg.weekly(&[rec("2025-02-14")]).len(), 4);
    }

    #[test]
    fn monthly_gap_filled_across_years() {
        let records = vec![rec("2024-11-05"), rec("2025-01-10")];
        let agg = TrendAggregator::new(TrendDefinition::new("Date").with_series_label("BSE"));
        let monthly = agg.monthly(&records, today());
        assert_eq!(monthly.len(), 24);
        assert_eq!(monthly[0].key(), "Jan-2024");
        assert_eq!(monthly[10].total, 1);
        assert_eq!(monthly[12].key(), "Jan-2025");
        assert_eq!(monthly[12].total, 1);
        assert!(monthly.iter().all(|m| m.entity_label == "BSE"));
    }

    #[test]
    fn monthly_observed_range_stops_at_last_month() {
        let records = vec![rec("2025-01-15"), rec("2025-03-02"), rec("2025-03-20")];
        let agg = TrendAggregator::new(
            TrendDefinition::new("Date").with_monthly_span(MonthlySpan::ObservedRange),
        );
        let monthly = agg.monthly(&records, today());
        let keys: Vec<(String, u64)> = monthly.iter().map(|m| (m.key(), m.total)).collect();
        assert_eq!(
            keys,
            vec![
                ("Jan-2025".to_string(), 1),
                ("Feb-2025".to_string(), 0),
                ("Mar-2025".to_string(), 2),
            ]
        );
    }

    #[test]
    fn monthly_empty_input_yields_current_year() {
        let agg = TrendAggregator::new(TrendDefinition::new("Date"));
        let monthly = agg.monthly(&[], today());
        assert_eq!(monthly.len(), 12);
        assert!(monthly.iter().all(|m| m.year == 2026 && m.total == 0));
        assert_eq!(monthly[11].month, "Dec");
    }

    #[test]
    fn entity_distribution_sorted_with_fallback() {
        let row = |entity: Option<&str>| {
            let mut r = rec("2025-09-01");
            if let Some(e) = entity {
                r.set("Entity", e);
            }
            r
        };
        let records = vec![
            row(Some("ACME")),
            row(Some("Beta")),
            row(Some("ACME")),
            row(None),
            row(Some("Total")),
        ];
        let agg = TrendAggregator::new(TrendDefinition::new("Date").with_entity_column("Entity"));
        let dist = agg.entity_distribution(&records);
        assert_eq!(dist[0], EntityPoint { entity: "ACME".into(), total: 2 });
        assert_eq!(dist.len(), 3);
        assert!(dist.iter().any(|p| p.entity == UNKNOWN_ENTITY));
        assert!(!dist.iter().any(|p| p.entity.eq_ignore_ascii_case("total")));
    }

    #[test]
    fn no_entity_column_counts_everything_as_unknown() {
        let agg = TrendAggregator::new(TrendDefinition::new("Date"));
        let dist = agg.entity_distribution(&[rec("2025-09-01"), rec("bad")]);
        assert_eq!(dist, vec![EntityPoint { entity: UNKNOWN_ENTITY.into(), total: 2 }]);
    }
}
