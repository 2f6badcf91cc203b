//! Analysis services.

pub mod detectors;
pub mod error_classifier;
pub mod flakiness;
pub mod grouping;
pub mod insights;

pub use detectors::{DetectionContext, Detector, default_detectors};
pub use error_classifier::{ErrorPatternFlags, classify_error};
pub use flakiness::{compute_flakiness, compute_flakiness_map};
pub use grouping::{ResultGroup, ResultGroups, group_results};
pub use insights::{InsightEngine, rank_insights, truncate_for_display};
