//! Pattern detectors.
//!
//! Each detector is an independent pass over the same read-only batch. The
//! engine runs every registered detector and ranks the combined output, so
//! detectors never depend on each other or on execution order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::InsightConfig;
use crate::models::{Insight, InsightType, TestExecutionRecord};

use super::error_classifier::{ErrorPatternFlags, classify_error};
use super::grouping::ResultGroups;

pub mod performance;
pub mod repeated_failure;
pub mod selector_issue;
pub mod timeout_pattern;

pub use flaky_test::FlakyTestDetector;
pub use performance::PerformanceRegressionDetector;
pub use repeated_failure::RepeatedFailureDetector;
pub use selector_issue::SelectorIssueDetector;
pub use timeout_pattern::TimeoutPatternDetector;

/// Inputs shared by every detector for one analysis run.
pub struct DetectionContext<'r, 'g> {
    /// Records grouped by test key
    pub groups: &'g ResultGroups<'r>,
    /// The raw batch, in input order
    pub records: &'r [TestExecutionRecord],
    pub config: &'g InsightConfig,
}

impl DetectionContext<'_, '_> {
    /// Display name for a test key, preferring the grouped name.
    pub fn display_name(&self, key: &str) -> String {
        self.groups
            .get(key)
            .map(|g| g.display_name().to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// A single pattern-detection pass.
pub trait Detector: Send + Sync {
    /// Insight type this detector emits.
    fn insight_type(&self) -> InsightType;

    /// Produce insights for the batch. Must not depend on other detectors.
    fn detect(&self, ctx: &DetectionContext<'_, '_>) -> Vec<Insight>;
}

/// The built-in detectors, in their fixed registration order.
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(FlakyTestDetector),
        Box::new(RepeatedFailureDetector),
        Box::new(SelectorIssueDetector),
        Box::new(TimeoutPatternDetector),
        Box::new(PerformanceRegressionDetector),
    ]
}

/// A failed record that matched an error-text filter.
pub(crate) struct MatchedFailure<'r> {
    pub record: &'r TestExecutionRecord,
    pub message: &'r str,
}

/// Scan every failed record in the raw batch, keep the ones whose message
/// satisfies `keep`, and group them by test key in input order.
///
/// Records without a key are ignored here; grouping already reported them.
pub(crate) fn failures_matching<'r>(
    records: &'r [TestExecutionRecord],
    keep: impl Fn(&ErrorPatternFlags) -> bool,
) -> BTreeMap<&'r str, Vec<MatchedFailure<'r>>> {
    let mut matched: BTreeMap<&'r str, Vec<MatchedFailure<'r>>> = BTreeMap::new();

    for record in records.iter().filter(|r| r.is_failed()) {
        let Some(key) = record.test_key() else {
            continue;
        };
        let Some(message) = record.error_message.as_deref() else {
            continue;
        };
        if keep(&classify_error(Some(message))) {
            matched
                .entry(key)
                .or_default()
                .push(MatchedFailure { record, message });
        }
    }

    matched
}

/// Up to three distinct messages, for insight metadata.
pub(crate) fn sample_messages(failures: &[MatchedFailure<'_>], max_chars: usize) -> Vec<String> {
    let mut samples: Vec<String> = Vec::new();
    for failure in failures {
        let excerpt = crate::models::insight::excerpt(failure.message, max_chars);
        if !samples.contains(&excerpt) {
            samples.push(excerpt);
        }
        if samples.len() == 3 {
            break;
        }
    }
    samples
}

/// Timestamp of the most recent matched failure.
pub(crate) fn last_seen(failures: &[MatchedFailure<'_>]) -> Option<DateTime<Utc>> {
    failures.iter().map(|f| f.record.created_at).max()
}

/// Percentage rounded to a whole number, for descriptions.
pub(crate) fn percent(rate: f64) -> i64 {
    (rate * 100.0).round() as i64
}
