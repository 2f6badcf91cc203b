//! Clusters failures caused by elements that could not be located.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::models::insight::excerpt;
use crate::models::{Insight, InsightType, Severity};

use super::{DetectionContext, Detector, failures_matching, last_seen, sample_messages};

pub struct SelectorIssueDetector;

impl Detector for SelectorIssueDetector {
    fn insight_type(&self) -> InsightType {
        InsightType::SelectorIssue
    }

    fn detect(&self, ctx: &DetectionContext<'_, '_>) -> Vec<Insight> {
        let config = ctx.config;
        let mut insights = Vec::new();

        let matched = failures_matching(ctx.records, |flags| flags.is_selector_related());

        for (key, failures) in matched {
            let count = failures.len();
            if count < config.selector_min_matches {
                continue;
            }

            let severity = if count >= config.selector_high_matches {
                Severity::High
            } else if count >= config.selector_medium_matches {
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
                title: format!("Selector issues: {}", name),
                description: format!(
                    "{} failures caused by elements that could not be located",
                    count
                ),
                affected_tests: vec![name],
                pattern: Some(excerpt(failures[0].message, config.pattern_max_chars)),
                occurrence_count: count,
                recommendation: "Use more stable selector strategies such as data-testid \
                    attributes or ARIA labels instead of CSS classes or XPath tied to page \
                    structure."
                    .to_string(),
                actionable: true,
                metadata,
            });
        }

        debug!("Selector issue detector emitted {} insights", insights.len());
        insights
    }
}
