//! GitHub Actions workflow family.

use std::marker::PhantomData;
use std::path::Path;

use crate::document::{Node, ParsedFile, has_extension};
use crate::family::{CheckType, DocumentFamily, marker_line_range};
use crate::registry::CheckRegistry;
use crate::yaml::parse_yaml_file;

use super::YAML_EXTENSIONS;

/// Workflow definitions under `.github/workflows/`.
///
/// Only documents with a top-level `jobs` key count as workflows. The
/// family ships its own checks, so it runs without external ones.
pub struct GithubActionsFamily<R> {
    registry: PhantomData<fn() -> R>,
}

impl<R> GithubActionsFamily<R> {
    pub fn new() -> Self {
        Self {
            registry: PhantomData,
        }
    }

    fn is_workflow_path(path: &Path) -> bool {
        has_extension(path, YAML_EXTENSIONS)
            && path
                .parent()
                .is_some_and(|dir| dir.ends_with(".github/workflows"))
    }
}

impl<R> Default for GithubActionsFamily<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CheckRegistry + Default> DocumentFamily for GithubActionsFamily<R> {
    type Registry = R;

    fn parse_file(&self, path: &Path) -> Option<ParsedFile> {
        if !Self::is_workflow_path(path) {
            return None;
        }
        let parsed = parse_yaml_file(path)?;
        if parsed.document.get("jobs").is_none() {
            return None;
        }
        Some(parsed)
    }

    fn import_registry(&self) -> R {
        R::default()
    }

    fn start_end_lines(&self, result_configuration: &Node) -> Option<(usize, usize)> {
        marker_line_range(result_configuration)
    }

    fn check_type(&self) -> CheckType {
        CheckType::GithubActions
    }

    fn included_paths(&self) -> Vec<String> {
        vec![".github".to_string()]
    }

    fn resource_id(&self, _path: &Path, result_key: &str, _supported_entities: &[String]) -> String {
        result_key.to_string()
    }

    fn require_external_checks(&self) -> bool {
        false
    }
}
