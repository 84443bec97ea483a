//! FILENAME: tests/test_trends.rs
//! Integration tests for trend aggregation over realistic record sets.

mod common;

use common::{dated, today, BseFixture};
use engine::RecordSchema;
use trend_engine::{
    latest_month, report_period_label, to_series, MonthlySpan, TrendAggregator, TrendDefinition,
    UNKNOWN_ENTITY,
};

fn bse_aggregator() -> TrendAggregator {
    let definition = TrendDefinition::from_schema(&RecordSchema::bse(), "BSE").unwrap();
    TrendAggregator::new(definition)
}

// ============================================================================
// SERIES SHAPE
// ============================================================================

#[test]
fn test_bse_series_from_schema() {
    let series = bse_aggregator().aggregate(&BseFixture::records(), today());

    // September 2025 is the latest month: days 1..=30 contiguous
    assert_eq!(series.daily.len(), 30);
    assert_eq!(series.daily[0].date, "2025-09-01");
    assert_eq!(series.daily[0].total, 1);
    assert_eq!(series.daily[1].total, 2);
    assert_eq!(series.daily[29].date, "2025-09-30");
    assert_eq!(series.total_in_daily(), 6);

    assert_eq!(series.weekly.len(), 5);
    assert_eq!(series.weekly[0].total, 3);
    assert_eq!(series.weekly[2].total, 1);
    assert_eq!(series.weekly[4].total, 2);

    assert_eq!(series.monthly.len(), 12);
    let july = &series.monthly[6];
    assert_eq!((july.key(), july.total), ("Jul-2025".to_string(), 1));
    assert!(series.monthly.iter().all(|m| m.entity_label == "BSE"));
}

#[test]
fn test_entity_distribution_excludes_total_and_labels_blanks() {
    let series = bse_aggregator().aggregate(&BseFixture::records(), today());
    let entities: Vec<(String, u64)> = series
        .entities
        .iter()
        .map(|p| (p.entity.clone(), p.total))
        .collect();

    assert_eq!(entities[0], ("ACME Ltd".to_string(), 3));
    assert_eq!(entities[1], ("Beta Corp".to_string(), 2));
    assert!(entities.contains(&(UNKNOWN_ENTITY.to_string(), 1)));
    assert!(entities.contains(&("Delta".to_string(), 1)));
    assert!(!entities.iter().any(|(e, _)| e == "TOTAL"));
}

#[test]
fn test_sebi_schema_has_no_entity_breakdown() {
    let definition = TrendDefinition::from_schema(&RecordSchema::sebi(), "SEBI").unwrap();
    assert!(definition.entity_column.is_none());

    let records = dated(&["2025-09-01", "2025-09-04"]);
    let dist = TrendAggregator::new(definition).entity_distribution(&records);
    assert_eq!(dist.len(), 1);
    assert_eq!(dist[0].entity, UNKNOWN_ENTITY);
    assert_eq!(dist[0].total, 2);
}

// ============================================================================
// MONTHLY SPAN
// ============================================================================

#[test]
fn test_january_and_march_fill_february() {
    let records = dated(&["2025-01-10", "2025-03-05"]);

    let observed = TrendAggregator::new(
        TrendDefinition::new("Date").with_monthly_span(MonthlySpan::ObservedRange),
    )
    .monthly(&records, today());
    assert_eq!(observed.len(), 3);
    assert_eq!(observed[1].key(), "Feb-2025");
    assert_eq!(observed[1].total, 0);

    let full = TrendAggregator::new(TrendDefinition::new("Date")).monthly(&records, today());
    assert_eq!(full.len(), 12);
    assert_eq!(full[1].total, 0);
    assert_eq!(full[2].total, 1);
}

#[test]
fn test_monthly_chronological_and_complete() {
    let records = dated(&["2023-06-01", "2025-02-01"]);
    let monthly = TrendAggregator::new(TrendDefinition::new("Date")).monthly(&records, today());
    assert_eq!(monthly.len(), 36);
    for pair in monthly.windows(2) {
        assert!((pair[0].year, pair[0].month.clone()) != (pair[1].year, pair[1].month.clone()));
        assert!(pair[0].year <= pair[1].year);
    }
    assert_eq!(monthly.iter().map(|m| m.total).sum::<u64>(), 2);
}

// ============================================================================
// EDGE CASES
// ============================================================================

#[test]
fn test_no_parseable_dates() {
    let records = dated(&["", "n/a", "32-13-2025"]);
    let series = TrendAggregator::new(TrendDefinition::new("Date")).aggregate(&records, today());
    assert!(series.daily.is_empty());
    assert!(series.weekly.is_empty());
    assert_eq!(series.monthly.len(), 12);
    assert!(series.monthly.iter().all(|m| m.year == 2026 && m.total == 0));
    assert_eq!(series.entities[0].total, 3);
}

#[test]
fn test_epoch_millis_dates_are_bucketed() {
    let records = vec![
        engine::NotificationRecord::from_pairs([("Date", engine::CellValue::Number(1_756_857_600_000.0))]),
        engine::NotificationRecord::from_pairs([("Date", engine::CellValue::from("2025-09-03"))]),
    ];
    let daily = TrendAggregator::new(TrendDefinition::new("Date")).daily(&records);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].date, "2025-09-03");
    assert_eq!(daily[0].total, 2);
}

#[test]
fn test_latest_month_and_period_label() {
    let records = BseFixture::records();
    let latest = latest_month(&records, "Date");
    assert_eq!(latest.len(), 6);
    assert_eq!(report_period_label(&latest, "Date", today()), "September 2025");
}

#[test]
fn test_generic_series_view() {
    let weekly = TrendAggregator::new(TrendDefinition::new("Date")).weekly(&dated(&["2025-09-08"]));
    let series = to_series(&weekly);
    assert_eq!(series[1].bucket_key, "Week 2");
    assert_eq!(series[1].count, 1);
}
