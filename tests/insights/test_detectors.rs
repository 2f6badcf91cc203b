//! Detector scenarios run through the full engine.

use mattermost_insights_lib::InsightEngine;
use mattermost_insights_lib::models::{Insight, InsightType, Severity, TestExecutionRecord};

use super::test_helpers::*;

fn of_type(insights: &[Insight], insight_type: InsightType) -> Vec<&Insight> {
    insights
        .iter()
        .filter(|i| i.insight_type == insight_type)
        .collect()
}

/// Most recent first: failed, failed, failed, passed, failed.
#[test]
fn test_repeated_failure_streak_of_three() {
    // history() is oldest first, so list the runs in reverse
    let records = history("r-1", "payments", &[F, P, F, F, F]);
    let insights = InsightEngine::default().generate_insights(&records);

    let repeated = of_type(&insights, InsightType::RepeatedFailure);
    assert_eq!(repeated.len(), 1);
    assert_eq!(repeated[0].severity, Severity::Medium);
    assert_eq!(repeated[0].occurrence_count, 3);
    assert_eq!(repeated[0].id, "repeated_failure-r-1");
}

#[test]
fn test_selector_clustering() {
    init_tracing();
    let records = vec![
        failure("s-1", "submit form", 0, "element not found: #submit"),
        failure("s-1", "submit form", 1, "Locator resolved to 0 elements"),
    ];
    let insights = InsightEngine::default().generate_insights(&records);

    let selector = of_type(&insights, InsightType::SelectorIssue);
    assert_eq!(selector.len(), 1);
    assert_eq!(selector[0].occurrence_count, 2);
    assert_eq!(selector[0].severity, Severity::Low);
    assert_eq!(selector[0].affected_tests, vec!["submit form".to_string()]);
}

#[test]
fn test_timeout_clustering() {
    let records: Vec<TestExecutionRecord> = (0..4)
        .map(|i| failure("to-1", "report export", i, "Timeout 30000ms exceeded."))
        .collect();
    let insights = InsightEngine::default().generate_insights(&records);

    let timeouts = of_type(&insights, InsightType::TimeoutPattern);
    assert_eq!(timeouts.len(), 1);
    assert_eq!(timeouts[0].severity, Severity::High);
    assert_eq!(timeouts[0].occurrence_count, 4);
}

/// Historical 500ms, recent 1200ms over 5 + 5 samples: +140%, high.
#[test]
fn test_performance_regression() {
    let records = timed(
        "p-1",
        "dashboard load",
        &[500, 500, 500, 500, 500, 1200, 1200, 1200, 1200, 1200],
    );
    let insights = InsightEngine::default().generate_insights(&records);

    assert_eq!(insights.len(), 1);
    let insight = &insights[0];
    assert_eq!(insight.insight_type, InsightType::PerformanceRegression);
    assert_eq!(insight.severity, Severity::High);
    assert!(insight.description.contains("140%"));
    assert!(insight.description.contains("500ms"));
    assert!(insight.description.contains("1200ms"));
}

/// One test can surface under several insight types.
#[test]
fn test_no_deduplication_across_types() {
    let records: Vec<TestExecutionRecord> = (0..5)
        .map(|i| {
            failure(
                "m-1",
                "settings",
                i,
                "Timeout 5000ms exceeded waiting for locator('#save')",
            )
        })
        .collect();
    let insights = InsightEngine::default().generate_insights(&records);

    let types: Vec<_> = insights.iter().map(|i| i.insight_type).collect();
    assert!(types.contains(&InsightType::RepeatedFailure));
    assert!(types.contains(&InsightType::SelectorIssue));
    assert!(types.contains(&InsightType::TimeoutPattern));
    assert!(insights.iter().all(|i| i.affected_tests == vec!["settings".to_string()]));
}

#[test]
fn test_every_insight_is_well_formed() {
    let mut records = history("f-1", "flaky", &[P, F, P, F, F, P]);
    records.extend(history("r-2", "broken", &[P, F, F, F, F, F]));
    records.push(failure("s-2", "nav", 0, "could not find element"));
    records.push(failure("s-2", "nav", 1, "no such element: .menu"));
    records.extend(timed("p-2", "slow", &[900, 900, 900, 2000, 2000, 2000]));

    let insights = InsightEngine::default().generate_insights(&records);
    assert_eq!(insights.len(), 4);

    for insight in &insights {
        assert!(!insight.affected_tests.is_empty());
        assert!(insight.occurrence_count > 0);
        assert!(insight.actionable);
        assert!(!insight.recommendation.is_empty());
        assert!(insight.pattern.as_ref().is_none_or(|p| p.chars().count() <= 200));
        assert!(insight.id.starts_with(insight.insight_type.as_str()));
    }
}
