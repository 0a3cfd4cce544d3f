//! Include/exclude decision for solution member projects
//!
//! Each configured entry is compared against the project name twice: first
//! literally after trimming both sides, then as a regular expression searched
//! anywhere in the name. An entry that is not a valid expression still takes
//! part in the literal comparison.

use regex::Regex;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Upper bound for a single regular-expression match.
pub const MATCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Unable to parse '{pattern}' as a regular expression")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Matching '{pattern}' did not finish within {}s", .timeout.as_secs())]
    Timeout { pattern: String, timeout: Duration },
}

/// Parsed include/exclude module lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFilter {
    included: Vec<String>,
    excluded: Vec<String>,
}

impl ModuleFilter {
    pub fn new(included: Vec<String>, excluded: Vec<String>) -> Self {
        Self { included, excluded }
    }

    /// Builds a filter from comma-separated lists. Blank entries are dropped.
    pub fn parse(included: Option<&str>, excluded: Option<&str>) -> Self {
        Self {
            included: split_patterns(included),
            excluded: split_patterns(excluded),
        }
    }

    pub fn included(&self) -> &[String] {
        &self.included
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn is_configured(&self) -> bool {
        !self.included.is_empty() || !self.excluded.is_empty()
    }

    pub fn is_excluded(&self, project_name: &str) -> bool {
        is_excluded(project_name, &self.included, &self.excluded)
    }
}

fn split_patterns(list: Option<&str>) -> Vec<String> {
    list.map(|list| {
        list.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Decides whether `project_name` is out of scope.
///
/// An include list, when present, is the only list consulted: the project is
/// excluded unless some entry matches. Otherwise the project is excluded when
/// any exclude entry matches. The first matching entry decides.
pub fn is_excluded(project_name: &str, included: &[String], excluded: &[String]) -> bool {
    if included.is_empty() && excluded.is_empty() {
        return false;
    }

    let project_name = project_name.trim();
    if !included.is_empty() {
        return !included
            .iter()
            .any(|pattern| matches_entry(project_name, pattern));
    }

    excluded
        .iter()
        .any(|pattern| matches_entry(project_name, pattern))
}

fn matches_entry(project_name: &str, pattern: &str) -> bool {
    if pattern.trim() == project_name {
        return true;
    }

    match regex_matches(project_name, pattern) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(error = %e, "Module pattern is not a usable regular expression, treating as no match");
            false
        }
    }
}

fn regex_matches(project_name: &str, pattern: &str) -> Result<bool, PatternError> {
    let regex = Regex::new(pattern).map_err(|source| PatternError::Invalid {
        pattern: pattern.to_string(),
        source,
    })?;

    match_within(regex, project_name.to_string(), MATCH_TIMEOUT)
}

fn match_within(regex: Regex, haystack: String, timeout: Duration) -> Result<bool, PatternError> {
    let pattern = regex.as_str().to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = tx.send(regex.is_match(&haystack));
    });

    rx.recv_timeout(timeout)
        .map_err(|_| PatternError::Timeout { pattern, timeout })
}
