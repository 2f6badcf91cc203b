//! Insight thresholds, with optional overrides from environment variables.

use std::env;
use std::str::FromStr;

/// Prefix for every threshold override environment variable.
pub const ENV_PREFIX: &str = "TSIO_INSIGHTS_";

/// Default threshold values.
pub mod defaults {
    pub const MIN_RUNS_FOR_FLAKINESS: usize = 3;
    pub const FLAKY_RATE_THRESHOLD: f64 = 0.20; // both pass and fail rate must reach this
    pub const FLAKY_HIGH_FAIL_RATE: f64 = 0.5;
    pub const FLAKY_MEDIUM_FAIL_RATE: f64 = 0.3;

    pub const REPEATED_FAILURE_MIN_STREAK: usize = 3;
    pub const REPEATED_FAILURE_HIGH_STREAK: usize = 5;

    pub const SELECTOR_MIN_MATCHES: usize = 2;
    pub const SELECTOR_MEDIUM_MATCHES: usize = 3;
    pub const SELECTOR_HIGH_MATCHES: usize = 5;

    // The guard equals the medium band, so low is unreachable with these values.
    pub const TIMEOUT_MIN_MATCHES: usize = 2;
    pub const TIMEOUT_MEDIUM_MATCHES: usize = 2;
    pub const TIMEOUT_HIGH_MATCHES: usize = 4;

    pub const PERF_MIN_SAMPLES: usize = 5;
    pub const PERF_MIN_INCREASE_PERCENT: f64 = 50.0;
    pub const PERF_MEDIUM_INCREASE_PERCENT: f64 = 75.0;
    pub const PERF_HIGH_INCREASE_PERCENT: f64 = 100.0;
    pub const PERF_MIN_RECENT_AVG_MS: f64 = 1000.0;

    pub const PATTERN_MAX_CHARS: usize = 200;
}

/// All tunable thresholds used by the flakiness scorer and pattern detectors.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    /// Minimum runs before a test can be classified as flaky
    pub min_runs_for_flakiness: usize,
    /// Pass rate and fail rate must both reach this value (inclusive)
    pub flaky_rate_threshold: f64,
    /// Fail rate above which a flaky test is high severity
    pub flaky_high_fail_rate: f64,
    /// Fail rate above which a flaky test is medium severity
    pub flaky_medium_fail_rate: f64,
    /// Consecutive recent failures needed to emit a repeated-failure insight
    pub repeated_failure_min_streak: usize,
    /// Streak length at which a repeated failure becomes high severity
    pub repeated_failure_high_streak: usize,
    /// Selector failures needed to emit a selector insight
    pub selector_min_matches: usize,
    pub selector_medium_matches: usize,
    pub selector_high_matches: usize,
    /// Timeout failures needed to emit a timeout insight
    pub timeout_min_matches: usize,
    pub timeout_medium_matches: usize,
    pub timeout_high_matches: usize,
    /// Minimum records, and minimum timed records, for regression analysis
    pub perf_min_samples: usize,
    /// Increase (percent) that must be exceeded to report a regression
    pub perf_min_increase_percent: f64,
    pub perf_medium_increase_percent: f64,
    pub perf_high_increase_percent: f64,
    /// Recent average duration (ms) that must be exceeded to report a regression
    pub perf_min_recent_avg_ms: f64,
    /// Maximum characters kept from an error message in `Insight::pattern`
    pub pattern_max_chars: usize,
    /// Optional cap applied by `InsightEngine::generate_report`
    pub max_display_insights: Option<usize>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        InsightConfig {
            min_runs_for_flakiness: defaults::MIN_RUNS_FOR_FLAKINESS,
            flaky_rate_threshold: defaults::FLAKY_RATE_THRESHOLD,
            flaky_high_fail_rate: defaults::FLAKY_HIGH_FAIL_RATE,
            flaky_medium_fail_rate: defaults::FLAKY_MEDIUM_FAIL_RATE,
            repeated_failure_min_streak: defaults::REPEATED_FAILURE_MIN_STREAK,
            repeated_failure_high_streak: defaults::REPEATED_FAILURE_HIGH_STREAK,
            selector_min_matches: defaults::SELECTOR_MIN_MATCHES,
            selector_medium_matches: defaults::SELECTOR_MEDIUM_MATCHES,
            selector_high_matches: defaults::SELECTOR_HIGH_MATCHES,
            timeout_min_matches: defaults::TIMEOUT_MIN_MATCHES,
            timeout_medium_matches: defaults::TIMEOUT_MEDIUM_MATCHES,
            timeout_high_matches: defaults::TIMEOUT_HIGH_MATCHES,
            perf_min_samples: defaults::PERF_MIN_SAMPLES,
            perf_min_increase_percent: defaults::PERF_MIN_INCREASE_PERCENT,
            perf_medium_increase_percent: defaults::PERF_MEDIUM_INCREASE_PERCENT,
            perf_high_increase_percent: defaults::PERF_HIGH_INCREASE_PERCENT,
            perf_min_recent_avg_ms: defaults::PERF_MIN_RECENT_AVG_MS,
            pattern_max_chars: defaults::PATTERN_MAX_CHARS,
            max_display_insights: None,
        }
    }
}

impl InsightConfig {
    /// Load thresholds from environment variables, falling back to defaults.
    ///
    /// Every field can be overridden with `TSIO_INSIGHTS_<FIELD>`, e.g.:
    /// - `TSIO_INSIGHTS_MIN_RUNS_FOR_FLAKINESS`: runs before flakiness applies (default: 3)
    /// - `TSIO_INSIGHTS_FLAKY_RATE_THRESHOLD`: pass/fail rate cutoff (default: 0.20)
    /// - `TSIO_INSIGHTS_PERF_MIN_RECENT_AVG_MS`: regression floor in ms (default: 1000)
    /// - `TSIO_INSIGHTS_MAX_DISPLAY_INSIGHTS`: cap on reported insights (default: unset)
    ///
    /// The resulting configuration is validated before it is returned.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = InsightConfig::default();

        let config = InsightConfig {
            min_runs_for_flakiness: env_or("MIN_RUNS_FOR_FLAKINESS", d.min_runs_for_flakiness)?,
            flaky_rate_threshold: env_or("FLAKY_RATE_THRESHOLD", d.flaky_rate_threshold)?,
            flaky_high_fail_rate: env_or("FLAKY_HIGH_FAIL_RATE", d.flaky_high_fail_rate)?,
            flaky_medium_fail_rate: env_or("FLAKY_MEDIUM_FAIL_RATE", d.flaky_medium_fail_rate)?,
            repeated_failure_min_streak: env_or(
                "REPEATED_FAILURE_MIN_STREAK",
                d.repeated_failure_min_streak,
            )?,
            repeated_failure_high_streak: env_or(
                "REPEATED_FAILURE_HIGH_STREAK",
                d.repeated_failure_high_streak,
            )?,
            selector_min_matches: env_or("SELECTOR_MIN_MATCHES", d.selector_min_matches)?,
            selector_medium_matches: env_or("SELECTOR_MEDIUM_MATCHES", d.selector_medium_matches)?,
            selector_high_matches: env_or("SELECTOR_HIGH_MATCHES", d.selector_high_matches)?,
            timeout_min_matches: env_or("TIMEOUT_MIN_MATCHES", d.timeout_min_matches)?,
            timeout_medium_matches: env_or("TIMEOUT_MEDIUM_MATCHES", d.timeout_medium_matches)?,
            timeout_high_matches: env_or("TIMEOUT_HIGH_MATCHES", d.timeout_high_matches)?,
            perf_min_samples: env_or("PERF_MIN_SAMPLES", d.perf_min_samples)?,
            perf_min_increase_percent: env_or(
                "PERF_MIN_INCREASE_PERCENT",
                d.perf_min_increase_percent,
            )?,
            perf_medium_increase_percent: env_or(
                "PERF_MEDIUM_INCREASE_PERCENT",
                d.perf_medium_increase_percent,
            )?,
            perf_high_increase_percent: env_or(
                "PERF_HIGH_INCREASE_PERCENT",
                d.perf_high_increase_percent,
            )?,
            perf_min_recent_avg_ms: env_or("PERF_MIN_RECENT_AVG_MS", d.perf_min_recent_avg_ms)?,
            pattern_max_chars: env_or("PATTERN_MAX_CHARS", d.pattern_max_chars)?,
            max_display_insights: env_opt("MAX_DISPLAY_INSIGHTS")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that rates are fractions, bands are ordered and minimums are non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        for (name, rate) in [
            ("flaky_rate_threshold", self.flaky_rate_threshold),
            ("flaky_high_fail_rate", self.flaky_high_fail_rate),
            ("flaky_medium_fail_rate", self.flaky_medium_fail_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                errors.push(format!("{} must be between 0 and 1 (got {})", name, rate));
            }
        }

        if self.flaky_medium_fail_rate > self.flaky_high_fail_rate {
            errors.push("flaky_medium_fail_rate must not exceed flaky_high_fail_rate".to_string());
        }

        if self.repeated_failure_min_streak > self.repeated_failure_high_streak {
            errors.push(
                "repeated_failure_min_streak must not exceed repeated_failure_high_streak"
                    .to_string(),
            );
        }

        if self.selector_medium_matches > self.selector_high_matches {
            errors.push("selector_medium_matches must not exceed selector_high_matches".to_string());
        }

        if self.timeout_medium_matches > self.timeout_high_matches {
            errors.push("timeout_medium_matches must not exceed timeout_high_matches".to_string());
        }

        if self.perf_min_increase_percent > self.perf_medium_increase_percent
            || self.perf_medium_increase_percent > self.perf_high_increase_percent
        {
            errors.push(
                "perf increase bands must be ordered: min <= medium <= high".to_string(),
            );
        }

        for (name, value) in [
            ("min_runs_for_flakiness", self.min_runs_for_flakiness),
            ("repeated_failure_min_streak", self.repeated_failure_min_streak),
            ("selector_min_matches", self.selector_min_matches),
            ("timeout_min_matches", self.timeout_min_matches),
            ("perf_min_samples", self.perf_min_samples),
            ("pattern_max_chars", self.pattern_max_chars),
        ] {
            if value == 0 {
                errors.push(format!("{} must be greater than 0", name));
            }
        }

        // Regression analysis needs at least one sample in each half.
        if self.perf_min_samples < 2 {
            errors.push("perf_min_samples must be at least 2".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(())
    }
}

/// Read `TSIO_INSIGHTS_<suffix>`, returning `default` when unset.
fn env_or<T: FromStr>(suffix: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(env_opt(suffix)?.unwrap_or(default))
}

fn env_opt<T: FromStr>(suffix: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(format!("{}{}", ENV_PREFIX, suffix)) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(suffix)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for TSIO_INSIGHTS_{0}")]
    InvalidValue(&'static str),

    #[error("Insight configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}
