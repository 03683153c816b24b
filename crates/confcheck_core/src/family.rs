//! Document family capability trait.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::document::{Node, ParsedFile};
use crate::registry::CheckRegistry;

/// Format class of the documents a runner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Pipeline definitions; findings carry structural metadata.
    GithubActions,
    /// Generic YAML documents.
    Yaml,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::GithubActions => "github_actions",
            CheckType::Yaml => "yaml",
        }
    }

    /// Returns true for the pipeline-definition family.
    pub fn is_pipeline(&self) -> bool {
        matches!(self, CheckType::GithubActions)
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a runner needs to know about one document family.
///
/// `parse_file` is called concurrently from worker threads.
pub trait DocumentFamily: Sync {
    type Registry: CheckRegistry;

    /// Parses one file. `None` means the file is not a document of this
    /// family (or is unreadable or empty) and is silently skipped.
    fn parse_file(&self, path: &Path) -> Option<ParsedFile>;

    /// Creates the registry holding this family's checks.
    fn import_registry(&self) -> Self::Registry;

    /// Derives the 1-based `(start, end)` lines of a result configuration.
    fn start_end_lines(&self, result_configuration: &Node) -> Option<(usize, usize)>;

    fn check_type(&self) -> CheckType;

    /// Entry names exempt from hidden-name filtering during traversal.
    fn included_paths(&self) -> Vec<String> {
        Vec::new()
    }

    /// Identifier of the resource a result refers to.
    fn resource_id(&self, path: &Path, result_key: &str, _supported_entities: &[String]) -> String {
        format!("{}.{}", path.display(), result_key)
    }

    /// Whether a run without external check directories has nothing to do.
    fn require_external_checks(&self) -> bool {
        true
    }
}

/// Reads line markers off a result configuration.
///
/// A mapping yields its own markers; a sequence spans from its first
/// element's start to its last element's end.
pub fn marker_line_range(node: &Node) -> Option<(usize, usize)> {
    match node {
        Node::Map(map) => Some((map.start_line()?, map.end_line()?)),
        Node::Seq(items) => {
            let start = items.first()?.as_mapping()?.start_line()?;
            let end = items.last()?.as_mapping()?.end_line()?;
            Some((start, end))
        }
        _ => None,
    }
}
