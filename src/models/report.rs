//! Combined analysis output for one batch of records.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::{FlakinessResult, Insight, Severity};

/// Insights plus per-test flakiness for a single analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    /// Ranked insights, truncated to the configured display limit
    pub insights: Vec<Insight>,
    /// Insights produced before display truncation
    pub total_insights: usize,
    /// Flakiness per test key
    pub flakiness: BTreeMap<String, FlakinessResult>,
    /// Records that were grouped and analyzed
    pub analyzed_records: usize,
    /// Records skipped because they had neither a test ID nor a name
    pub skipped_records: usize,
}

/// Number of insights per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl InsightReport {
    /// Count the reported insights by severity.
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for insight in &self.insights {
            match insight.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    /// Number of tests currently classified as flaky.
    pub fn flaky_test_count(&self) -> usize {
        self.flakiness.values().filter(|f| f.is_flaky).count()
    }
}
