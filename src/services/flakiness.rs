//! Pass/fail ratios, flaky classification and failure trend per test.

use std::collections::BTreeMap;

use crate::config::InsightConfig;
use crate::models::{FlakinessResult, TestExecutionRecord, Trend};

use super::grouping::{ResultGroup, ResultGroups};

/// Compute flakiness metrics for one test's runs.
///
/// Every run counts in the denominator, so skipped or pending runs lower both
/// rates. Groups smaller than `min_runs_for_flakiness` are never flaky and
/// always report a stable trend.
pub fn compute_flakiness(group: &ResultGroup<'_>, config: &InsightConfig) -> FlakinessResult {
    let total_runs = group.total_runs();
    if total_runs == 0 {
        return FlakinessResult::empty();
    }

    let passed = group.records.iter().filter(|r| r.is_passed()).count();
    let failed = group.records.iter().filter(|r| r.is_failed()).count();

    let pass_rate = passed as f64 / total_runs as f64;
    let fail_rate = failed as f64 / total_runs as f64;

    if total_runs < config.min_runs_for_flakiness {
        return FlakinessResult {
            pass_rate,
            fail_rate,
            total_runs,
            is_flaky: false,
            trend: Trend::Stable,
        };
    }

    let is_flaky =
        pass_rate >= config.flaky_rate_threshold && fail_rate >= config.flaky_rate_threshold;

    FlakinessResult {
        pass_rate,
        fail_rate,
        total_runs,
        is_flaky,
        trend: failure_trend(&group.newest_first()),
    }
}

/// Compare the failure rate of the recent half against the older half.
///
/// `newest_first` must be sorted most recent first. With an odd count the
/// extra run lands in the recent half.
pub fn failure_trend(newest_first: &[&TestExecutionRecord]) -> Trend {
    if newest_first.len() < 2 {
        return Trend::Stable;
    }

    let mid = newest_first.len().div_ceil(2);
    let (recent, older) = newest_first.split_at(mid);

    let recent_rate = failure_rate(recent);
    let older_rate = failure_rate(older);

    if recent_rate > older_rate {
        Trend::Increasing
    } else if recent_rate < older_rate {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn failure_rate(records: &[&TestExecutionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let failed = records.iter().filter(|r| r.is_failed()).count();
    failed as f64 / records.len() as f64
}

/// Flakiness for every test in the batch, keyed by test key.
pub fn compute_flakiness_map(
    groups: &ResultGroups<'_>,
    config: &InsightConfig,
) -> BTreeMap<String, FlakinessResult> {
    groups
        .iter()
        .map(|group| (group.key.clone(), compute_flakiness(group, config)))
        .collect()
}
