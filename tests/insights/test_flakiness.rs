//! Flakiness scoring through the engine API.

use mattermost_insights_lib::models::{InsightType, Trend};
use mattermost_insights_lib::services::{compute_flakiness, group_results};
use mattermost_insights_lib::{InsightConfig, InsightEngine};

use super::test_helpers::*;

/// 5 passed / 5 failed interleaved: flaky, medium severity (0.5 is not above 0.5).
#[test]
fn test_half_and_half_is_flaky_medium() {
    let records = history("t-1", "checkout", &[P, F, P, F, P, F, P, F, P, F]);
    let engine = InsightEngine::default();

    let flakiness = engine.compute_flakiness(&records);
    let result = &flakiness["t-1"];
    assert_eq!(result.pass_rate, 0.5);
    assert!(result.is_flaky);

    let insights = engine.generate_insights(&records);
    let flaky: Vec<_> = insights
        .iter()
        .filter(|i| i.insight_type == InsightType::FlakyTest)
        .collect();
    assert_eq!(flaky.len(), 1);
    assert_eq!(flaky[0].severity.as_str(), "medium");
    assert_eq!(flaky[0].occurrence_count, 10);
}

/// Ten straight passes: no insights, not flaky, stable.
#[test]
fn test_all_passing_has_no_signal() {
    let records = history("t-2", "login", &[P; 10]);
    let engine = InsightEngine::default();

    assert!(engine.generate_insights(&records).is_empty());

    let result = &engine.compute_flakiness(&records)["t-2"];
    assert!(!result.is_flaky);
    assert_eq!(result.trend, Trend::Stable);
}

/// Below three runs flakiness is still reported, but never flaky.
#[test]
fn test_short_history_is_reported_but_not_flaky() {
    let records = history("t-3", "search", &[P, F]);
    let engine = InsightEngine::default();

    let result = &engine.compute_flakiness(&records)["t-3"];
    assert_eq!(result.total_runs, 2);
    assert_eq!(result.fail_rate, 0.5);
    assert!(!result.is_flaky);
    assert_eq!(result.trend, Trend::Stable);
    assert!(engine.generate_insights(&records).is_empty());
}

#[test]
fn test_trend_reflects_recent_failures() {
    let records = history("t-4", "upload", &[P, P, P, P, F, F, F, F]);
    let groups = group_results(&records);
    let result = compute_flakiness(groups.get("t-4").unwrap(), &InsightConfig::default());
    assert_eq!(result.trend, Trend::Increasing);

    let records = history("t-5", "upload", &[F, F, F, S, P, P, P, P]);
    let groups = group_results(&records);
    let result = compute_flakiness(groups.get("t-5").unwrap(), &InsightConfig::default());
    assert_eq!(result.trend, Trend::Decreasing);
}

#[test]
fn test_custom_threshold_changes_classification() {
    // fail rate 0.25
    let records = history("t-6", "export", &[P, P, P, F]);

    let strict = InsightEngine::new(InsightConfig {
        flaky_rate_threshold: 0.3,
        ..InsightConfig::default()
    });
    assert!(!strict.compute_flakiness(&records)["t-6"].is_flaky);

    let default = InsightEngine::default();
    assert!(default.compute_flakiness(&records)["t-6"].is_flaky);
}
