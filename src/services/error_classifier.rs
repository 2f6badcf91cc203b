//! Keyword heuristics for categorizing failure messages.

/// Categories detected in a failure message. Several may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPatternFlags {
    pub selector_issue: bool,
    pub timeout: bool,
    pub not_found: bool,
    pub network_error: bool,
    pub assertion_error: bool,
}

impl ErrorPatternFlags {
    /// True when the failure looks like an element could not be located.
    pub fn is_selector_related(&self) -> bool {
        self.selector_issue || self.not_found
    }

    pub fn any(&self) -> bool {
        self.selector_issue
            || self.timeout
            || self.not_found
            || self.network_error
            || self.assertion_error
    }
}

const SELECTOR_KEYWORDS: &[&str] = &["selector", "locator", "element", "xpath", "css selector"];
const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "timed out", "exceeded"];
const NOT_FOUND_KEYWORDS: &[&str] = &[
    "not found",
    "could not find",
    "unable to locate",
    "no such element",
];
const NETWORK_KEYWORDS: &[&str] = &["network", "fetch", "connection", "econnrefused"];
const ASSERTION_KEYWORDS: &[&str] = &["assertion", "expect", "assert", "should"];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Classify a failure message. Missing or empty messages yield no flags.
pub fn classify_error(message: Option<&str>) -> ErrorPatternFlags {
    let Some(message) = message.filter(|m| !m.is_empty()) else {
        return ErrorPatternFlags::default();
    };

    let lower = message.to_lowercase();

    ErrorPatternFlags {
        selector_issue: contains_any(&lower, SELECTOR_KEYWORDS),
        timeout: contains_any(&lower, TIMEOUT_KEYWORDS),
        not_found: contains_any(&lower, NOT_FOUND_KEYWORDS),
        network_error: contains_any(&lower, NETWORK_KEYWORDS),
        assertion_error: contains_any(&lower, ASSERTION_KEYWORDS),
    }
}
