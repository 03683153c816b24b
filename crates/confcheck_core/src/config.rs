//! Scan filter configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ScanError;

/// Filter configuration handed to the path filter and to every registry scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanFilter {
    /// Check ids to run. Empty means all checks.
    #[serde(default)]
    pub checks: Vec<String>,

    /// Check ids never to run. Takes priority over `checks`.
    #[serde(default)]
    pub skip_checks: Vec<String>,

    /// Paths to exclude from directory traversal (globs or substrings).
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl ScanFilter {
    /// Creates an empty filter that runs every check on every path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the filter from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScanError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parses the filter from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json)
            .map_err(|e| ScanError::config(format!("Invalid scan filter: {}", e)))
    }

    /// Returns whether a check should run under this filter.
    ///
    /// The backward-compat id is matched the same way as the primary id.
    pub fn should_run_check(&self, check_id: &str, bc_check_id: Option<&str>) -> bool {
        let matches = |list: &[String]| {
            list.iter()
                .any(|c| c == check_id || Some(c.as_str()) == bc_check_id)
        };

        if matches(&self.skip_checks) {
            return false;
        }
        self.checks.is_empty() || matches(&self.checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_filter_default_runs_everything() {
        let filter = ScanFilter::new();
        assert!(filter.should_run_check("CKV_GHA_1", None));
        assert!(filter.excluded_paths.is_empty());
    }

    #[test]
    fn test_filter_from_json() {
        let json = r#"{
            "checks": ["CKV_GHA_1"],
            "skip_checks": ["CKV_GHA_2"],
            "excluded_paths": ["**/vendor/**"]
        }"#;

        let filter = ScanFilter::from_json(json).unwrap();
        assert_eq!(filter.checks, vec!["CKV_GHA_1"]);
        assert_eq!(filter.skip_checks, vec!["CKV_GHA_2"]);
        assert_eq!(filter.excluded_paths, vec!["**/vendor/**"]);
    }

    #[test]
    fn test_filter_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "skip_checks": ["CKV_GHA_3"] }}"#).unwrap();

        let filter = ScanFilter::from_file(file.path()).unwrap();
        assert!(!filter.should_run_check("CKV_GHA_3", None));
    }

    #[test]
    fn test_filter_from_missing_file() {
        let err = ScanFilter::from_file("/nonexistent/filter.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[rstest]
    #[case::unknown_field(r#"{ "checkz": [] }"#)]
    #[case::type_mismatch(r#"{ "checks": "CKV_GHA_1" }"#)]
    #[case::not_json("checks = []")]
    fn test_filter_rejects_invalid_json(#[case] json: &str) {
        let err = ScanFilter::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains("Invalid scan filter"),
            "unexpected error: {}",
            err
        );
    }

    #[rstest]
    #[case::allowed(&["A"], &[], "A", None, true)]
    #[case::not_in_allow_list(&["A"], &[], "B", None, false)]
    #[case::skipped(&[], &["A"], "A", None, false)]
    #[case::skip_wins(&["A"], &["A"], "A", None, false)]
    #[case::bc_id_allowed(&["BC_1"], &[], "A", Some("BC_1"), true)]
    #[case::bc_id_skipped(&[], &["BC_1"], "A", Some("BC_1"), false)]
    fn test_should_run_check(
        #[case] checks: &[&str],
        #[case] skip: &[&str],
        #[case] id: &str,
        #[case] bc_id: Option<&str>,
        #[case] expected: bool,
    ) {
        let filter = ScanFilter {
            checks: checks.iter().map(|s| s.to_string()).collect(),
            skip_checks: skip.iter().map(|s| s.to_string()).collect(),
            excluded_paths: Vec::new(),
        };
        assert_eq!(filter.should_run_check(id, bc_id), expected);
    }
}
