//! Test execution record model: one run of one test, as supplied by the query layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Test execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Pending,
    Running,
}

impl TestStatus {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Pending => "pending",
            Self::Running => "running",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single historical test execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestExecutionRecord {
    /// Stable test identifier (empty when the source had none)
    #[serde(default, deserialize_with = "lenient::string")]
    pub test_id: String,
    /// Test name
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Execution status
    pub status: TestStatus,
    /// Execution duration in milliseconds
    #[serde(
        default,
        deserialize_with = "lenient::duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_ms: Option<u64>,
    /// Failure message, if any
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
    /// When the run was recorded
    pub created_at: DateTime<Utc>,
}

impl TestExecutionRecord {
    /// Create a new record with no duration or error message.
    pub fn new(
        test_id: impl Into<String>,
        name: impl Into<String>,
        status: TestStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        TestExecutionRecord {
            test_id: test_id.into(),
            name: name.into(),
            status,
            duration_ms: None,
            error_message: None,
            created_at,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Grouping key: the test ID when present, otherwise the name.
    ///
    /// Returns `None` when both are empty.
    pub fn test_key(&self) -> Option<&str> {
        if !self.test_id.is_empty() {
            Some(&self.test_id)
        } else if !self.name.is_empty() {
            Some(&self.name)
        } else {
            None
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == TestStatus::Failed
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Field deserializers that degrade malformed values instead of rejecting the
/// whole record. A bad row in a batch must not fail the batch.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through, numbers are stringified, anything else is empty.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Only non-negative integers are durations.
    pub fn duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_u64(),
            _ => None,
        })
    }
}
