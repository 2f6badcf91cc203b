//! Shared record builders for insight engine tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mattermost_insights_lib::models::{TestExecutionRecord, TestStatus};

pub use mattermost_insights_lib::models::TestStatus::{Failed as F, Passed as P, Skipped as S};

/// Fixed reference time so every run is reproducible.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
}

/// Timestamp `minutes` after the reference time.
pub fn minutes(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

/// Runs of one test, oldest first, one minute apart.
pub fn history(test_id: &str, name: &str, statuses: &[TestStatus]) -> Vec<TestExecutionRecord> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| TestExecutionRecord::new(test_id, name, *status, minutes(i as i64)))
        .collect()
}

/// A failed run with an error message.
pub fn failure(test_id: &str, name: &str, at: i64, message: &str) -> TestExecutionRecord {
    TestExecutionRecord::new(test_id, name, TestStatus::Failed, minutes(at)).with_error(message)
}

/// Passing runs with the given durations, oldest first.
pub fn timed(test_id: &str, name: &str, durations: &[u64]) -> Vec<TestExecutionRecord> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| {
            TestExecutionRecord::new(test_id, name, TestStatus::Passed, minutes(i as i64))
                .with_duration(*d)
        })
        .collect()
}

/// Install a test subscriber once so engine logs show up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic shuffle: interleave from both ends.
pub fn scramble<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    let (mut lo, mut hi) = (0usize, items.len());
    while lo < hi {
        hi -= 1;
        out.push(items[hi].clone());
        if lo < hi {
            out.push(items[lo].clone());
            lo += 1;
        }
    }
    out
}
