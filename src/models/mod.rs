//! Domain models for the test insights engine.

pub mod flakiness;
pub mod insight;
pub mod report;
pub mod test_result;

// Re-export commonly used types
pub use flakiness::{FlakinessResult, Trend};
pub use insight::{Insight, InsightType, Severity};
pub use report::{InsightReport, SeverityCounts};
pub use test_result::{TestExecutionRecord, TestStatus};
