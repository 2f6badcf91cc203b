//! Flags tests whose recent runs are much slower than their history.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::models::{Insight, InsightType, Severity};

use super::{DetectionContext, Detector};

pub struct PerformanceRegressionDetector;

/// Mean durations of the older and recent halves of a test's timed runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationComparison {
    pub historical_avg_ms: f64,
    pub recent_avg_ms: f64,
    pub increase_percent: f64,
}

impl DurationComparison {
    /// The older half averaged zero, so the increase is unbounded.
    pub fn from_zero_baseline(&self) -> bool {
        self.increase_percent.is_infinite()
    }
}

/// Split durations (oldest first) at the midpoint and compare the halves.
///
/// The recent half takes the extra sample when the count is odd. A zero
/// historical average with a non-zero recent one is an infinite increase.
/// Returns `None` for fewer than two samples or when both halves average zero.
pub fn compare_durations(oldest_first: &[u64]) -> Option<DurationComparison> {
    if oldest_first.len() < 2 {
        return None;
    }

    let mid = oldest_first.len() / 2;
    let (older, recent) = oldest_first.split_at(mid);

    let historical_avg_ms = mean(older);
    let recent_avg_ms = mean(recent);

    let increase_percent = if historical_avg_ms > 0.0 {
        (recent_avg_ms - historical_avg_ms) / historical_avg_ms * 100.0
    } else if recent_avg_ms > 0.0 {
        f64::INFINITY
    } else {
        return None;
    };

    Some(DurationComparison {
        historical_avg_ms,
        recent_avg_ms,
        increase_percent,
    })
}

fn mean(values: &[u64]) -> f64 {
    values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
}

impl Detector for PerformanceRegressionDetector {
    fn insight_type(&self) -> InsightType {
        InsightType::PerformanceRegression
    }

    fn detect(&self, ctx: &DetectionContext<'_, '_>) -> Vec<Insight> {
        let config = ctx.config;
        let mut insights = Vec::new();

        for group in ctx.groups.iter() {
            if group.total_runs() < config.perf_min_samples {
                continue;
            }

            let durations: Vec<u64> = group
                .oldest_first()
                .iter()
                .filter_map(|r| r.duration_ms)
                .collect();
            if durations.len() < config.perf_min_samples {
                continue;
            }

            let Some(comparison) = compare_durations(&durations) else {
                continue;
            };

            if comparison.increase_percent <= config.perf_min_increase_percent
                || comparison.recent_avg_ms <= config.perf_min_recent_avg_ms
            {
                continue;
            }

            let severity = if comparison.increase_percent > config.perf_high_increase_percent {
                Severity::High
            } else if comparison.increase_percent > config.perf_medium_increase_percent {
                Severity::Medium
            } else {
                Severity::Low
            };

            let name = group.display_name();
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "historicalAvgMs".to_string(),
                json!(comparison.historical_avg_ms.round()),
            );
            metadata.insert(
                "recentAvgMs".to_string(),
                json!(comparison.recent_avg_ms.round()),
            );
            if !comparison.from_zero_baseline() {
                metadata.insert(
                    "increasePercent".to_string(),
                    json!(comparison.increase_percent.round()),
                );
            }

            let description = if comparison.from_zero_baseline() {
                format!(
                    "Average duration increased from a zero baseline (0ms → {}ms)",
                    comparison.recent_avg_ms.round() as i64
                )
            } else {
                format!(
                    "Average duration increased by {}% ({}ms → {}ms)",
                    comparison.increase_percent.round() as i64,
                    comparison.historical_avg_ms.round() as i64,
                    comparison.recent_avg_ms.round() as i64
                )
            };

            insights.push(Insight {
                id: self.insight_type().insight_id(&group.key),
                insight_type: self.insight_type(),
                severity,
                title: format!("Performance regression: {}", name),
                description,
                affected_tests: vec![name.to_string()],
                pattern: None,
                occurrence_count: durations.len(),
                recommendation: "Profile the test to find the slow steps and review recent \
                    code changes that may have introduced the slowdown."
                    .to_string(),
                actionable: true,
                metadata,
            });
        }

        debug!("Performance regression detector emitted {} insights", insights.len());
        insights
    }
}
