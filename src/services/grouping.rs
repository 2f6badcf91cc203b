//! Partitions a flat record list into per-test groups.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::InsightError;
use crate::models::TestExecutionRecord;

/// All runs of one test, in input order.
#[derive(Debug, Clone)]
pub struct ResultGroup<'a> {
    /// Test ID, or name when the ID is empty
    pub key: String,
    /// Display name taken from the first record that has one
    pub name: String,
    pub records: Vec<&'a TestExecutionRecord>,
}

impl<'a> ResultGroup<'a> {
    fn new(key: &str) -> Self {
        ResultGroup {
            key: key.to_string(),
            name: String::new(),
            records: Vec::new(),
        }
    }

    fn push(&mut self, record: &'a TestExecutionRecord) {
        if self.name.is_empty() && !record.name.is_empty() {
            self.name = record.name.clone();
        }
        self.records.push(record);
    }

    pub fn total_runs(&self) -> usize {
        self.records.len()
    }

    /// Name shown in insights; falls back to the key.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.key
        } else {
            &self.name
        }
    }

    /// Records ordered most recent first. Ties keep input order.
    pub fn newest_first(&self) -> Vec<&'a TestExecutionRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// Records ordered oldest first. Ties keep input order.
    pub fn oldest_first(&self) -> Vec<&'a TestExecutionRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|r| r.created_at);
        sorted
    }
}

/// Grouped records, iterated in key order.
#[derive(Debug, Default)]
pub struct ResultGroups<'a> {
    groups: BTreeMap<String, ResultGroup<'a>>,
    /// Records that could not be grouped
    pub skipped: Vec<InsightError>,
}

impl<'a> ResultGroups<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &ResultGroup<'a>> {
        self.groups.values()
    }

    pub fn get(&self, key: &str) -> Option<&ResultGroup<'a>> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped records.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(|g| g.records.len()).sum()
    }
}

/// Group records by test key, skipping (and logging) records without one.
pub fn group_results<'a, I>(records: I) -> ResultGroups<'a>
where
    I: IntoIterator<Item = &'a TestExecutionRecord>,
{
    let mut result = ResultGroups::default();

    for (index, record) in records.into_iter().enumerate() {
        let Some(key) = record.test_key() else {
            warn!("Skipping record {} with neither testId nor name", index);
            result.skipped.push(InsightError::InvalidRecord { index });
            continue;
        };

        result
            .groups
            .entry(key.to_string())
            .or_insert_with(|| ResultGroup::new(key))
            .push(record);
    }

    result
}
