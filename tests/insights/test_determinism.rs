//! Ordering, determinism and grouping completeness.

use std::collections::BTreeMap;

use mattermost_insights_lib::InsightEngine;
use mattermost_insights_lib::models::{Severity, TestExecutionRecord};
use mattermost_insights_lib::services::group_results;

use super::test_helpers::*;

/// A batch that triggers every detector at least once.
fn mixed_batch() -> Vec<TestExecutionRecord> {
    let mut records = history("f-1", "flaky checkout", &[P, F, P, F, P, F, F, P]);
    records.extend(history("r-1", "broken login", &[P, P, F, F, F, F, F, F]));
    records.extend((0..3).map(|i| failure("s-1", "menu", i, "Unable to locate element #menu")));
    records.extend((0..2).map(|i| failure("t-1", "export", 10 + i, "Navigation timed out")));
    records.extend(timed("p-1", "reports", &[800, 800, 800, 800, 800, 1700, 1700, 1700, 1700, 1700]));
    records
}

#[test]
fn test_same_input_same_output() {
    let engine = InsightEngine::default();
    let records = mixed_batch();

    let first = engine.generate_insights(&records);
    let second = engine.generate_insights(&records);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_input_order_does_not_change_output() {
    let engine = InsightEngine::default();
    let records = mixed_batch();

    let mut reversed = records.clone();
    reversed.reverse();

    let baseline = engine.generate_insights(&records);
    assert_eq!(baseline, engine.generate_insights(&reversed));
    assert_eq!(baseline, engine.generate_insights(&scramble(&records)));
}

#[test]
fn test_output_is_ranked() {
    let insights = InsightEngine::default().generate_insights(&mixed_batch());

    for pair in insights.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.severity < b.severity
                || (a.severity == b.severity && a.occurrence_count >= b.occurrence_count),
            "{} should not rank above {}",
            b.id,
            a.id
        );
    }
    assert_eq!(insights[0].severity, Severity::High);
}

#[test]
fn test_grouping_keeps_every_record_once() {
    let records = mixed_batch();
    let groups = group_results(&records);

    assert_eq!(groups.record_count(), records.len());
    assert!(groups.skipped.is_empty());

    let mut seen: BTreeMap<*const TestExecutionRecord, usize> = BTreeMap::new();
    for group in groups.iter() {
        for record in &group.records {
            *seen.entry(*record as *const _).or_default() += 1;
        }
    }
    assert_eq!(seen.len(), records.len());
    assert!(seen.values().all(|count| *count == 1));
}

#[test]
fn test_invalid_records_are_skipped_not_fatal() {
    let mut records = history("r-1", "broken login", &[F, F, F]);
    records.push(TestExecutionRecord::new("", "", F, minutes(99)));

    let engine = InsightEngine::default();
    let insights = engine.generate_insights(&records);
    assert_eq!(insights.len(), 1);

    let report = engine.generate_report(&records);
    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.analyzed_records, 3);
}

#[test]
fn test_empty_input() {
    let engine = InsightEngine::default();
    assert!(engine.generate_insights(&[]).is_empty());
    assert!(engine.compute_flakiness(&[]).is_empty());
}
