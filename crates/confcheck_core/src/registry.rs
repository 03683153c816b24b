//! Check registry interface and raw check results.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::ScanFilter;
use crate::document::Node;
use crate::error::ScanError;
use crate::suppression::Suppressions;

/// Severity assigned to a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// Outcome of one check against one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "UPPERCASE")]
pub enum CheckOutcome {
    Passed,
    Failed,
    Skipped {
        #[serde(skip_serializing_if = "Option::is_none")]
        suppress_comment: Option<String>,
    },
}

impl CheckOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::Passed => "PASSED",
            CheckOutcome::Failed => "FAILED",
            CheckOutcome::Skipped { .. } => "SKIPPED",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the check that produced a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIdentity {
    pub id: String,
    /// Backward-compatible id.
    pub bc_id: Option<String>,
    pub name: String,
    pub severity: Option<Severity>,
    /// Entity kinds the check applies to.
    pub supported_entities: Vec<String>,
    /// Name of the implementation that defines the check.
    pub class_name: String,
}

impl CheckIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bc_id: None,
            name: name.into(),
            severity: None,
            supported_entities: Vec::new(),
            class_name: String::new(),
        }
    }

    pub fn with_bc_id(mut self, bc_id: impl Into<String>) -> Self {
        self.bc_id = Some(bc_id.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_supported_entities(mut self, entities: &[&str]) -> Self {
        self.supported_entities = entities.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

/// A result as produced by a registry, before it becomes a finding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCheckResult {
    /// The check that produced the result. Results without one are dropped.
    pub check: Option<CheckIdentity>,
    /// The part of the document the check evaluated; carries line markers.
    pub result_configuration: Option<Node>,
    pub outcome: CheckOutcome,
    /// Document keys the check looked at.
    pub evaluated_keys: Vec<String>,
}

impl RawCheckResult {
    pub fn new(check: CheckIdentity, outcome: CheckOutcome) -> Self {
        Self {
            check: Some(check),
            result_configuration: None,
            outcome,
            evaluated_keys: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, configuration: Node) -> Self {
        self.result_configuration = Some(configuration);
        self
    }

    pub fn with_evaluated_keys(mut self, keys: &[&str]) -> Self {
        self.evaluated_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }
}

/// Scan output of one file: result key to raw result, in registry order.
pub type ScanResults = Vec<(String, RawCheckResult)>;

/// A set of checks that can be run against a parsed document.
pub trait CheckRegistry {
    /// Loads additional checks from a directory.
    fn load_external_checks(&mut self, directory: &Path) -> Result<(), ScanError>;

    /// Runs every applicable check against one document.
    fn scan(
        &self,
        path: &Path,
        document: &Node,
        suppressions: &Suppressions,
        filter: &ScanFilter,
    ) -> ScanResults;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_serialization() {
        let passed = serde_json::to_value(CheckOutcome::Passed).unwrap();
        assert_eq!(passed, serde_json::json!({ "result": "PASSED" }));

        let skipped = serde_json::to_value(CheckOutcome::Skipped {
            suppress_comment: Some("accepted risk".into()),
        })
        .unwrap();
        assert_eq!(
            skipped,
            serde_json::json!({ "result": "SKIPPED", "suppress_comment": "accepted risk" })
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(CheckOutcome::Failed.to_string(), "FAILED");
        assert_eq!(
            CheckOutcome::Skipped {
                suppress_comment: None
            }
            .to_string(),
            "SKIPPED"
        );
    }

    #[test]
    fn test_check_identity_builder() {
        let check = CheckIdentity::new("CKV_GHA_1", "Ensure ACTIONS_ALLOW_UNSECURE_COMMANDS isn't true")
            .with_bc_id("BC_REPO_GITHUB_ACTION_1")
            .with_severity(Severity::High)
            .with_supported_entities(&["jobs"])
            .with_class_name("checks.github_actions.AllowUnsecureCommands");

        assert_eq!(check.bc_id.as_deref(), Some("BC_REPO_GITHUB_ACTION_1"));
        assert_eq!(check.severity, Some(Severity::High));
        assert_eq!(check.supported_entities, vec!["jobs"]);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_value(Severity::Critical).unwrap(),
            serde_json::json!("CRITICAL")
        );
    }
}
