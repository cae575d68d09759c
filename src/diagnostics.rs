//! Structured skip reasons for analysis runs.
//!
//! Every file that contributes zero facts is reported with a reason, both
//! on stderr for humans and inside the snapshot metadata for consumers.
//! Ordering is deterministic via sort_key().

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Reason why a file was skipped during analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// File is not a regular file (directory, symlink, etc.)
    NotAFile,
    /// Extension not mapped to a supported language
    UnsupportedLanguage,
    /// Syntax tree could not be built for the file
    ParseFailure,
    /// File absent from the requested git revision
    MissingInRevision,
}

impl SkipReason {
    /// Stable sort key for deterministic reporting order.
    ///
    /// Lower values = higher priority in reporting.
    pub fn sort_key(&self) -> u8 {
        match self {
            SkipReason::NotAFile => 0,
            SkipReason::UnsupportedLanguage => 1,
            SkipReason::ParseFailure => 2,
            SkipReason::MissingInRevision => 3,
        }
    }

    /// Human-readable description for stderr output.
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::NotAFile => "not a regular file",
            SkipReason::UnsupportedLanguage => "language not supported",
            SkipReason::ParseFailure => "file did not parse",
            SkipReason::MissingInRevision => "absent from requested revision",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for SkipReason {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SkipReason {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A file that contributed zero facts, with the reason.
///
/// Serialized into snapshot metadata as an explicit skip marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    /// File path as supplied to the run
    pub file: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

impl SkippedFile {
    pub fn new(file: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            file: file.into(),
            reason,
        }
    }
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_keys_are_unique() {
        let reasons = [
            SkipReason::NotAFile,
            SkipReason::UnsupportedLanguage,
            SkipReason::ParseFailure,
            SkipReason::MissingInRevision,
        ];
        let mut keys: Vec<u8> = reasons.iter().map(|r| r.sort_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), reasons.len());
    }

    #[test]
    fn test_ordering_follows_sort_key() {
        assert!(SkipReason::NotAFile < SkipReason::ParseFailure);
        assert!(SkipReason::ParseFailure < SkipReason::MissingInRevision);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&SkipReason::ParseFailure).unwrap(),
            "\"parse_failure\""
        );
    }

    #[test]
    fn test_display() {
        let skipped = SkippedFile::new("broken.py", SkipReason::ParseFailure);
        assert_eq!(skipped.to_string(), "broken.py: file did not parse");
    }
}
