use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ScanFilter;
use crate::document::{Mapping, Node, ParsedFile, raw_lines};
use crate::error::ScanError;
use crate::family::{CheckType, DocumentFamily, marker_line_range};
use crate::registry::{CheckOutcome, CheckRegistry, RawCheckResult, ScanResults};
use crate::suppression::Suppressions;

/// Registry that replays canned results per path.
///
/// Suppressed ids come back as skipped and ids rejected by the filter
/// are left out, like a real registry would do.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRegistry {
    pub results: HashMap<PathBuf, ScanResults>,
    pub external_dirs: Vec<PathBuf>,
}

impl CheckRegistry for ScriptedRegistry {
    fn load_external_checks(&mut self, directory: &Path) -> Result<(), ScanError> {
        if !directory.is_dir() {
            return Err(ScanError::registry(format!(
                "External checks directory not found: {}",
                directory.display()
            )));
        }
        self.external_dirs.push(directory.to_path_buf());
        Ok(())
    }

    fn scan(
        &self,
        path: &Path,
        _document: &Node,
        suppressions: &Suppressions,
        filter: &ScanFilter,
    ) -> ScanResults {
        let Some(results) = self.results.get(path) else {
            return Vec::new();
        };
        results
            .iter()
            .filter(|(_, r)| {
                r.check.as_ref().is_none_or(|c| {
                    filter.should_run_check(&c.id, c.bc_id.as_deref())
                })
            })
            .map(|(key, result)| {
                let mut result = result.clone();
                if let Some(check) = &result.check
                    && suppressions.contains(&check.id)
                {
                    result.outcome = CheckOutcome::Skipped {
                        suppress_comment: suppressions.comment_for(&check.id).map(String::from),
                    };
                }
                (key.clone(), result)
            })
            .collect()
    }
}

/// Family whose "parser" looks documents up in a table.
pub struct StubFamily {
    check_type: CheckType,
    documents: HashMap<PathBuf, ParsedFile>,
    registry: ScriptedRegistry,
    require_external_checks: bool,
}

impl StubFamily {
    pub fn new(check_type: CheckType) -> Self {
        Self {
            check_type,
            documents: HashMap::new(),
            registry: ScriptedRegistry::default(),
            require_external_checks: false,
        }
    }

    /// A minimal document, optionally carrying a top-level `name`.
    pub fn named_document(name: Option<&str>) -> Node {
        let mut root = Mapping::new();
        if let Some(name) = name {
            root.push("name", Node::Str(name.to_string()));
        }
        Node::Map(root)
    }

    pub fn with_document(mut self, path: impl AsRef<Path>, content: &str, document: Node) -> Self {
        self.documents.insert(
            path.as_ref().to_path_buf(),
            ParsedFile::new(document, raw_lines(content)),
        );
        self
    }

    pub fn with_results(mut self, path: impl AsRef<Path>, results: ScanResults) -> Self {
        self.registry
            .results
            .insert(path.as_ref().to_path_buf(), results);
        self
    }

    pub fn requiring_external_checks(mut self) -> Self {
        self.require_external_checks = true;
        self
    }
}

impl DocumentFamily for StubFamily {
    type Registry = ScriptedRegistry;

    fn parse_file(&self, path: &Path) -> Option<ParsedFile> {
        self.documents.get(path).cloned()
    }

    fn import_registry(&self) -> Self::Registry {
        self.registry.clone()
    }

    fn start_end_lines(&self, result_configuration: &Node) -> Option<(usize, usize)> {
        marker_line_range(result_configuration)
    }

    fn check_type(&self) -> CheckType {
        self.check_type
    }

    fn require_external_checks(&self) -> bool {
        self.require_external_checks
    }
}

/// A failed result located at `start..=end`.
pub fn failed_at(id: &str, start: usize, end: usize) -> RawCheckResult {
    RawCheckResult::new(
        crate::registry::CheckIdentity::new(id, format!("check {}", id)),
        CheckOutcome::Failed,
    )
    .with_configuration(Node::Map(Mapping::new().with_lines(start, end)))
}
