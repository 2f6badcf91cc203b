//! Insight models: ranked diagnostic findings surfaced to reviewers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Insight severity. Ordered most severe first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank: high = 0, medium = 1, low = 2.
    pub fn order(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of finding.
///
/// `ErrorCluster` and `CoverageGap` are reserved; no detector emits them yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    FlakyTest,
    RepeatedFailure,
    SelectorIssue,
    TimeoutPattern,
    PerformanceRegression,
    ErrorCluster,
    CoverageGap,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlakyTest => "flaky_test",
            Self::RepeatedFailure => "repeated_failure",
            Self::SelectorIssue => "selector_issue",
            Self::TimeoutPattern => "timeout_pattern",
            Self::PerformanceRegression => "performance_regression",
            Self::ErrorCluster => "error_cluster",
            Self::CoverageGap => "coverage_gap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flaky_test" => Some(Self::FlakyTest),
            "repeated_failure" => Some(Self::RepeatedFailure),
            "selector_issue" => Some(Self::SelectorIssue),
            "timeout_pattern" => Some(Self::TimeoutPattern),
            "performance_regression" => Some(Self::PerformanceRegression),
            "error_cluster" => Some(Self::ErrorCluster),
            "coverage_gap" => Some(Self::CoverageGap),
            _ => None,
        }
    }

    /// Deterministic insight ID for a test key, e.g. `flaky_test-login-spec`.
    pub fn insight_id(&self, test_key: &str) -> String {
        format!("{}-{}", self.as_str(), test_key)
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Derived from type and test key; stable across regenerations
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub severity: Severity,
    pub title: String,
    /// Human-readable summary with concrete figures
    pub description: String,
    /// Names of the affected tests (never empty)
    pub affected_tests: Vec<String>,
    /// Representative error excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub occurrence_count: usize,
    pub recommendation: String,
    pub actionable: bool,
    /// Supplementary figures for the UI; not part of the ranking contract
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub metadata: BTreeMap<String, JsonValue>,
}

/// Truncate an error message to at most `max_chars` characters.
pub fn excerpt(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}
