//! Test health insights library.
//!
//! Ingests historical test execution records and produces per-test flakiness
//! metrics plus a ranked list of diagnostic insights (flaky tests, repeated
//! failures, selector fragility, timeout clustering, performance regressions).

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::InsightConfig;
pub use error::{InsightError, InsightResult};
pub use services::insights::InsightEngine;
