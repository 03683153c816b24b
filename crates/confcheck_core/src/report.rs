//! Report accumulation.

use serde::Serialize;

use crate::family::CheckType;
use crate::finding::Finding;
use crate::registry::CheckOutcome;

/// Ordered findings of one run, tagged with the document family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub check_type: CheckType,
    findings: Vec<Finding>,
}

/// Finding counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Report {
    pub fn new(check_type: CheckType) -> Self {
        Self {
            check_type,
            findings: Vec::new(),
        }
    }

    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// All findings in insertion order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn passed(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| matches!(f.check_result, CheckOutcome::Passed))
    }

    pub fn failed(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| matches!(f.check_result, CheckOutcome::Failed))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| matches!(f.check_result, CheckOutcome::Skipped { .. }))
    }

    pub fn summary(&self) -> Summary {
        self.findings
            .iter()
            .fold(Summary::default(), |mut summary, finding| {
                match finding.check_result {
                    CheckOutcome::Passed => summary.passed += 1,
                    CheckOutcome::Failed => summary.failed += 1,
                    CheckOutcome::Skipped { .. } => summary.skipped += 1,
                }
                summary
            })
    }

    /// Removes `prefix` from the front of every display path and resource id.
    ///
    /// Values that do not start with the prefix are left alone.
    pub fn strip_path_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() {
            return;
        }
        for finding in &mut self.findings {
            if let Some(rest) = finding.file_path.strip_prefix(prefix) {
                finding.file_path = rest.to_string();
            }
            if let Some(rest) = finding.resource.strip_prefix(prefix) {
                finding.resource = rest.to_string();
            }
        }
    }
}
