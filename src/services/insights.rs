//! Insight engine: groups records, runs every detector and ranks the results.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{info, instrument};

use crate::config::InsightConfig;
use crate::error::InsightResult;
use crate::models::{FlakinessResult, Insight, InsightReport, TestExecutionRecord};

use super::detectors::{DetectionContext, Detector, default_detectors};
use super::flakiness::compute_flakiness_map;
use super::grouping::group_results;

/// Stateless analysis engine. Safe to share across threads; each call works
/// only on the records it is given.
pub struct InsightEngine {
    config: InsightConfig,
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        InsightEngine::new(InsightConfig::default())
    }
}

impl InsightEngine {
    /// Engine with the built-in detectors.
    ///
    /// The configuration is used as given; call [`InsightEngine::try_new`] to
    /// reject inverted bands or zero minimums first.
    pub fn new(config: InsightConfig) -> Self {
        InsightEngine::with_detectors(config, default_detectors())
    }

    /// Engine with the built-in detectors and a validated configuration.
    pub fn try_new(config: InsightConfig) -> InsightResult<Self> {
        config.validate()?;
        Ok(InsightEngine::new(config))
    }

    /// Engine with a custom detector set. The configuration is not validated.
    pub fn with_detectors(config: InsightConfig, detectors: Vec<Box<dyn Detector>>) -> Self {
        InsightEngine { config, detectors }
    }

    /// Engine configured from `TSIO_INSIGHTS_*` environment variables.
    pub fn from_env() -> InsightResult<Self> {
        Ok(InsightEngine::new(InsightConfig::from_env()?))
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Run every detector over the batch and return the ranked insights.
    ///
    /// Records without a test ID or name are skipped. Empty input yields an
    /// empty list.
    #[instrument(name = "insights.generate", skip_all, fields(records = records.len()))]
    pub fn generate_insights(&self, records: &[TestExecutionRecord]) -> Vec<Insight> {
        let groups = group_results(records);
        let ctx = DetectionContext {
            groups: &groups,
            records,
            config: &self.config,
        };

        let insights = self.run_detectors(&ctx);

        info!(
            "Generated {} insights from {} records across {} tests ({} skipped)",
            insights.len(),
            groups.record_count(),
            groups.len(),
            groups.skipped.len()
        );

        insights
    }

    /// Flakiness metrics for every test in the batch, keyed by test key.
    #[instrument(name = "insights.flakiness", skip_all, fields(records = records.len()))]
    pub fn compute_flakiness(
        &self,
        records: &[TestExecutionRecord],
    ) -> BTreeMap<String, FlakinessResult> {
        let groups = group_results(records);
        compute_flakiness_map(&groups, &self.config)
    }

    /// Insights and flakiness in one pass, truncated to `max_display_insights`.
    #[instrument(name = "insights.report", skip_all, fields(records = records.len()))]
    pub fn generate_report(&self, records: &[TestExecutionRecord]) -> InsightReport {
        let groups = group_results(records);
        let ctx = DetectionContext {
            groups: &groups,
            records,
            config: &self.config,
        };

        let insights = self.run_detectors(&ctx);
        let total_insights = insights.len();
        let insights = match self.config.max_display_insights {
            Some(limit) => truncate_for_display(insights, limit),
            None => insights,
        };

        info!(
            "Report: {} of {} insights, {} tests, {} records skipped",
            insights.len(),
            total_insights,
            groups.len(),
            groups.skipped.len()
        );

        InsightReport {
            insights,
            total_insights,
            flakiness: compute_flakiness_map(&groups, &self.config),
            analyzed_records: groups.record_count(),
            skipped_records: groups.skipped.len(),
        }
    }

    fn run_detectors(&self, ctx: &DetectionContext<'_, '_>) -> Vec<Insight> {
        let insights: Vec<Insight> = self
            .detectors
            .iter()
            .flat_map(|detector| detector.detect(ctx))
            .collect();
        rank_insights(insights)
    }
}

/// Order insights most severe first, then by occurrence count descending.
///
/// Remaining ties fall back to insight type order and then ID, so the result
/// does not depend on the order detectors ran in.
pub fn rank_insights(mut insights: Vec<Insight>) -> Vec<Insight> {
    insights.sort_by(compare_insights);
    insights
}

fn compare_insights(a: &Insight, b: &Insight) -> Ordering {
    a.severity
        .order()
        .cmp(&b.severity.order())
        .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
        .then_with(|| a.insight_type.cmp(&b.insight_type))
        .then_with(|| a.id.cmp(&b.id))
}

/// Keep the first `limit` insights, preserving rank order.
pub fn truncate_for_display(mut insights: Vec<Insight>, limit: usize) -> Vec<Insight> {
    insights.truncate(limit);
    insights
}
