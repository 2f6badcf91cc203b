//! Per-test flakiness metrics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direction of the failure rate between the older and the recent half of a test's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent runs fail more often
    Increasing,
    /// Recent runs fail less often
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flakiness metrics for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlakinessResult {
    /// Passed runs / total runs
    pub pass_rate: f64,
    /// Failed runs / total runs
    pub fail_rate: f64,
    pub total_runs: usize,
    pub is_flaky: bool,
    pub trend: Trend,
}

impl FlakinessResult {
    /// Result for a test with no runs.
    pub fn empty() -> Self {
        FlakinessResult {
            pass_rate: 0.0,
            fail_rate: 0.0,
            total_runs: 0,
            is_flaky: false,
            trend: Trend::Stable,
        }
    }

    /// Pass rate as a rounded whole percentage.
    pub fn pass_percent(&self) -> u32 {
        (self.pass_rate * 100.0).round() as u32
    }
}
