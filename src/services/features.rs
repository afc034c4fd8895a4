//! Issue-tracker ticket extraction.
//!
//! Tickets look like `<PROJECT>-<digits>`. Matching ignores ASCII case and
//! results are always uppercased, so `dakota-12` and `Dakota-12` both become
//! `DAKOTA-12`. Non-ASCII look-alikes such as KELVIN SIGN never match an ASCII
//! letter of the prefix.

use regex::Regex;
use tracing::warn;

/// Compiled ticket patterns for one project prefix.
#[derive(Debug, Clone)]
pub struct FeatureMatcher {
    /// Matches tickets anywhere in free text.
    anywhere: Option<Regex>,
    /// Matches a string that is exactly one ticket.
    exact: Option<Regex>,
}

impl FeatureMatcher {
    /// Build the matcher. A blank prefix matches nothing.
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return FeatureMatcher {
                anywhere: None,
                exact: None,
            };
        }

        let ticket = format!("{}-[0-9]+", ascii_case_insensitive(prefix));
        FeatureMatcher {
            anywhere: compile(&ticket),
            exact: compile(&format!("^{}$", ticket)),
        }
    }

    /// Every ticket in `text`, left to right, duplicates included.
    pub fn from_text(&self, text: &str) -> Vec<String> {
        match &self.anywhere {
            Some(re) => re
                .find_iter(text)
                .map(|m| m.as_str().to_uppercase())
                .collect(),
            None => Vec::new(),
        }
    }

    /// The tags that are exactly a ticket of this project, in order.
    pub fn from_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<String> {
        match &self.exact {
            Some(re) => tags
                .iter()
                .map(|tag| tag.as_ref().trim())
                .filter(|tag| re.is_match(tag))
                .map(str::to_uppercase)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Escape `prefix` and let each ASCII letter match either case. Other
/// characters match only themselves.
fn ascii_case_insensitive(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                format!("[{}{}]", c.to_ascii_lowercase(), c.to_ascii_uppercase())
            } else {
                regex::escape(c.encode_utf8(&mut [0; 4]))
            }
        })
        .collect()
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| warn!("Unable to compile ticket pattern {}: {}", pattern, e))
        .ok()
}

/// Extract tickets of project `prefix` from free text.
pub fn extract_from_text(prefix: &str, text: &str) -> Vec<String> {
    FeatureMatcher::new(prefix).from_text(text)
}

/// Keep the tags that are tickets of project `prefix`.
pub fn extract_from_tags<S: AsRef<str>>(prefix: &str, tags: &[S]) -> Vec<String> {
    FeatureMatcher::new(prefix).from_tags(tags)
}
