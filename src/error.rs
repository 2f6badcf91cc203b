//! Domain error types for the insights engine.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use crate::config::ConfigError;

/// Insight engine errors.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    /// Record has neither a test ID nor a name, so it cannot be grouped
    #[error("Invalid record at position {index}: missing both testId and name")]
    InvalidRecord { index: usize },

    /// Threshold configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience type alias for Results with InsightError.
pub type InsightResult<T> = Result<T, InsightError>;
