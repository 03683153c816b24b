//! Inline suppression directives.
//!
//! A file opts out of a check with a comment anywhere in its source:
//!
//! ```yaml
//! jobs:
//!   build:  # checkov:skip=CKV_GHA_1: pinned by the release process
//!     runs-on: ubuntu-latest
//! ```
//!
//! Both the `checkov:skip=` and `confcheck:skip=` prefixes are accepted.
//! The text after the second colon is kept as the suppression comment.

use std::sync::OnceLock;

use regex::Regex;

use crate::document::RawLine;

/// Suppressed check ids for one file, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suppressions {
    entries: Vec<(String, Option<String>)>,
}

impl Suppressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a suppression. A repeated id keeps its first comment.
    pub fn insert(&mut self, check_id: impl Into<String>, comment: Option<String>) {
        let check_id = check_id.into();
        if !self.contains(&check_id) {
            self.entries.push((check_id, comment));
        }
    }

    pub fn contains(&self, check_id: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == check_id)
    }

    /// Returns the comment attached to a suppressed id, if any.
    pub fn comment_for(&self, check_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == check_id)
            .and_then(|(_, comment)| comment.as_deref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derives the suppression set of a file from its raw lines.
pub trait SuppressionCollector: Send + Sync {
    fn collect(&self, lines: &[RawLine]) -> Suppressions;
}

/// Collects `checkov:skip=` / `confcheck:skip=` comment directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentDirectives;

fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(r"(?:checkov|confcheck):skip= *([A-Za-z_\d]+)(?::([^\n]+))?")
            .expect("Invalid suppression directive regex")
    })
}

impl SuppressionCollector for CommentDirectives {
    fn collect(&self, lines: &[RawLine]) -> Suppressions {
        let regex = directive_regex();
        let mut suppressions = Suppressions::new();
        for line in lines {
            for caps in regex.captures_iter(&line.text) {
                let Some(id) = caps.get(1) else {
                    continue;
                };
                let comment = caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|c| !c.is_empty());
                suppressions.insert(id.as_str(), comment);
            }
        }
        suppressions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::raw_lines;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_collect_directives_with_comments() {
        let lines = raw_lines(
            "jobs:\n  build: # checkov:skip=CKV_GHA_1: pinned upstream\n    runs-on: x # confcheck:skip=CKV_GHA_7\n",
        );

        let suppressions = CommentDirectives.collect(&lines);

        assert_eq!(suppressions.ids().collect::<Vec<_>>(), vec!["CKV_GHA_1", "CKV_GHA_7"]);
        assert_eq!(suppressions.comment_for("CKV_GHA_1"), Some("pinned upstream"));
        assert_eq!(suppressions.comment_for("CKV_GHA_7"), None);
    }

    #[test]
    fn test_collect_multiple_directives_on_one_line() {
        let lines = raw_lines("# checkov:skip=A_1 checkov:skip=B_2");
        let suppressions = CommentDirectives.collect(&lines);
        assert_eq!(suppressions.ids().collect::<Vec<_>>(), vec!["A_1", "B_2"]);
    }

    #[rstest]
    #[case::no_directive("name: ci")]
    #[case::other_tool("# eslint-disable no-console")]
    #[case::missing_id("# checkov:skip=")]
    fn test_collect_without_directive(#[case] source: &str) {
        assert!(CommentDirectives.collect(&raw_lines(source)).is_empty());
    }

    #[test]
    fn test_repeated_id_keeps_first_comment() {
        let mut suppressions = Suppressions::new();
        suppressions.insert("CKV_1", Some("first".into()));
        suppressions.insert("CKV_1", Some("second".into()));
        assert_eq!(suppressions.len(), 1);
        assert_eq!(suppressions.comment_for("CKV_1"), Some("first"));
    }
}
