//! Clusters timeout failures per test.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::models::insight::excerpt;
use crate::models::{Insight, InsightType, Severity};

use super::{DetectionContext, Detector, failures_matching, last_seen, sample_messages};

pub struct TimeoutPatternDetector;

impl Detector for TimeoutPatternDetector {
    fn insight_type(&self) -> InsightType {
        InsightType::TimeoutPattern
    }

    fn detect(&self, ctx: &DetectionContext<'_, '_>) -> Vec<Insight> {
        let config = ctx.config;
        let mut insights = Vec::new();

        let matched = failures_matching(ctx.records, |flags| flags.timeout);

        for (key, failures) in matched {
            let count = failures.len();
            if count < config.timeout_min_matches {
                continue;
            }

            // Low is unreachable while the guard equals the medium band.
            let severity = if count >= config.timeout_high_matches {
                Severity::High
            } else if count >= config.timeout_medium_matches {
                Severity::Medium
            } else {
                Severity::Low
            };

            let name = ctx.display_name(key);
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "errorMessages".to_string(),
                json!(sample_messages(&failures, config.pattern_max_chars)),
            );
            metadata.insert("lastSeenAt".to_string(), json!(last_seen(&failures)));

            insights.push(Insight {
                id: self.insight_type().insight_id(key),
                insight_type: self.insight_type(),
                severity,
                title: format!("Timeout pattern: {}", name),
                description: format!("{} failures caused by timeouts", count),
                affected_tests: vec![name],
                pattern: Some(excerpt(failures[0].message, config.pattern_max_chars)),
                occurrence_count: count,
                recommendation: "Review timeout values and check for slow responses from the \
                    application or its dependencies. Prefer explicit waits for specific \
                    conditions over fixed delays."
                    .to_string(),
                actionable: true,
                metadata,
            });
        }

        debug!("Timeout pattern detector emitted {} insights", insights.len());
        insights
    }
}
