//! Flags tests whose most recent runs all failed.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::models::insight::excerpt;
use crate::models::{Insight, InsightType, Severity};

use super::{DetectionContext, Detector};

pub struct RepeatedFailureDetector;

impl Detector for RepeatedFailureDetector {
    fn insight_type(&self) -> InsightType {
        InsightType::RepeatedFailure
    }

    fn detect(&self, ctx: &DetectionContext<'_, '_>) -> Vec<Insight> {
        let config = ctx.config;
        let mut insights = Vec::new();

        for group in ctx.groups.iter() {
            let newest_first = group.newest_first();
            let streak = newest_first.iter().take_while(|r| r.is_failed()).count();

            if streak < config.repeated_failure_min_streak {
                continue;
            }

            // Streaks below the emission guard never reach here, so there is no low band.
            let severity = if streak >= config.repeated_failure_high_streak {
                Severity::High
            } else {
                Severity::Medium
            };

            let latest = newest_first[0];
            let name = group.display_name();

            let mut metadata = BTreeMap::new();
            metadata.insert("lastFailureAt".to_string(), json!(latest.created_at));

            insights.push(Insight {
                id: self.insight_type().insight_id(&group.key),
                insight_type: self.insight_type(),
                severity,
                title: format!("Repeated failures: {}", name),
                description: format!(
                    "Test has failed {} consecutive times in its most recent runs",
                    streak
                ),
                affected_tests: vec![name.to_string()],
                pattern: latest
                    .error_message
                    .as_deref()
                    .map(|m| excerpt(m, config.pattern_max_chars)),
                occurrence_count: streak,
                recommendation: "This test is consistently failing and needs urgent attention. \
                    Check recent changes to the application or the test itself."
                    .to_string(),
                actionable: true,
                metadata,
            });
        }

        debug!("Repeated failure detector emitted {} insights", insights.len());
        insights
    }
}
