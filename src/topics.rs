//! Topic entries and the `?topic=` payload format
//!
//! Every generated code carries a URL of the form `<base_url>?topic=<key>`.
//! Generic scanners simply open the URL; the companion app looks up the
//! `topic` query value and routes to the matching view.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Base URL used when no configuration overrides it
pub const DEFAULT_BASE_URL: &str = "https://github.com/DavidPinheiro1/World-Wide-Connect";

/// Query parameter carrying the topic key
pub const TOPIC_PARAM: &str = "topic";

/// A label (output file stem) paired with the topic key appended to the base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Human-facing label, used verbatim as the output file stem
    pub label: String,
    /// Topic key placed in the `topic` query parameter
    pub url_suffix: String,
}

impl TopicEntry {
    /// Create a new entry
    pub fn new(label: impl Into<String>, url_suffix: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url_suffix: url_suffix.into(),
        }
    }

    /// Full URL encoded into this entry's QR code
    pub fn payload(&self, base_url: &str) -> String {
        format!("{base_url}?{TOPIC_PARAM}={}", self.url_suffix)
    }

    /// Output file name, `<label>.png`
    pub fn file_name(&self) -> String {
        format!("{}.png", self.label)
    }

    /// Reject labels that would escape the output folder and suffixes that
    /// would not survive query matching.
    pub fn validate(&self) -> Result<()> {
        let label = self.label.as_str();
        if label.is_empty() {
            return Err(Error::InvalidTopic("label must not be empty".to_string()));
        }
        if label == "." || label == ".." || label.contains(['/', '\\']) {
            return Err(Error::InvalidTopic(format!(
                "label '{label}' cannot be used as a file name"
            )));
        }

        let suffix = self.url_suffix.as_str();
        if suffix.is_empty() {
            return Err(Error::InvalidTopic(format!(
                "topic key for '{label}' must not be empty"
            )));
        }
        if suffix.contains(['&', '#', '?']) || suffix.chars().any(char::is_whitespace) {
            return Err(Error::InvalidTopic(format!(
                "topic key '{suffix}' for '{label}' contains reserved characters"
            )));
        }

        Ok(())
    }
}

/// Parses the CLI form `LABEL=SUFFIX`.
impl FromStr for TopicEntry {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (label, suffix) = value
            .split_once('=')
            .ok_or_else(|| format!("expected LABEL=SUFFIX, got '{value}'"))?;
        let entry = TopicEntry::new(label.trim(), suffix.trim());
        entry.validate().map_err(|e| e.to_string())?;
        Ok(entry)
    }
}

/// The built-in topic map, in generation order.
pub fn default_topics() -> Vec<TopicEntry> {
    vec![
        TopicEntry::new("Mensa", "mensa"),
        TopicEntry::new("Transportation", "transport"),
        TopicEntry::new("Citizenship", "citizen"),
    ]
}

/// Validate every entry and make sure no two entries write the same file.
pub fn validate_topics(topics: &[TopicEntry]) -> Result<()> {
    if topics.is_empty() {
        return Err(Error::InvalidTopic("no topics configured".to_string()));
    }

    let mut seen = HashSet::new();
    for entry in topics {
        entry.validate()?;
        if !seen.insert(entry.label.as_str()) {
            return Err(Error::InvalidTopic(format!(
                "duplicate label '{}'",
                entry.label
            )));
        }
    }
    Ok(())
}

/// Extract the topic key from a scanned payload.
///
/// Looks at the query string only and returns the value of the first
/// `topic` parameter, stopping at the next `&` or `#`.
pub fn topic_key(payload: &str) -> Option<&str> {
    let (_, query) = payload.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == TOPIC_PARAM && !value.is_empty()).then_some(value)
    })
}
