//! Conversion of raw check results into located findings.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::document::RawLine;
use crate::family::DocumentFamily;
use crate::registry::{CheckOutcome, RawCheckResult, Severity};
use crate::structure::RunMetadata;

/// A located, normalized report of one check outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub check_id: String,
    pub bc_check_id: Option<String>,
    pub check_name: String,
    pub check_result: CheckOutcome,
    pub evaluated_keys: Vec<String>,
    /// Source lines of the finding with one line of context on each side.
    pub code_block: Vec<RawLine>,
    /// Path relative to the scan root, rendered with a leading `/`.
    pub file_path: String,
    /// `(start, end + 1)` of the evaluated configuration.
    pub file_line_range: (usize, usize),
    pub resource: String,
    pub check_class: String,
    pub file_abs_path: PathBuf,
    pub severity: Option<Severity>,
    /// Pipeline metadata; present only for the pipeline family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<RunMetadata>,
}

/// How a finding's display path is relativized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathDisplay {
    /// Relative to the scan root (the current directory when there is none).
    #[default]
    ScanRoot,
    /// Relative to the file's own directory, i.e. just the file name.
    ///
    /// Mirrors hosts whose separator differs from the scan root's, where
    /// relativizing against the root is unreliable.
    FileParent,
}

impl PathDisplay {
    /// Renders `file` as `/<relative path>` with `/` separators.
    pub fn display_path(&self, file: &Path, root: Option<&Path>) -> String {
        let file = absolute(file);
        let base = match self {
            PathDisplay::ScanRoot => match root {
                Some(root) => absolute(root),
                None => std::env::current_dir().unwrap_or_default(),
            },
            PathDisplay::FileParent => file.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        let relative = pathdiff::diff_paths(&file, &base).unwrap_or_else(|| file.clone());
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect();
        format!("/{}", parts.join("/"))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Returns the raw lines `start - 1 ..= end + 1`, clipped to the file.
///
/// `lines[i]` holds line `i + 1`.
pub fn code_snippet(lines: &[RawLine], start: usize, end: usize) -> Vec<RawLine> {
    let from = start.saturating_sub(2).min(lines.len());
    let to = end.saturating_add(1).min(lines.len());
    if from >= to {
        return Vec::new();
    }
    lines[from..to].to_vec()
}

/// Builds findings for the files of one run.
pub struct FindingBuilder<'a, F: DocumentFamily> {
    family: &'a F,
    root: Option<&'a Path>,
    path_display: PathDisplay,
    metadata: Option<&'a RunMetadata>,
}

impl<'a, F: DocumentFamily> FindingBuilder<'a, F> {
    pub fn new(
        family: &'a F,
        root: Option<&'a Path>,
        path_display: PathDisplay,
        metadata: Option<&'a RunMetadata>,
    ) -> Self {
        Self {
            family,
            root,
            path_display,
            metadata,
        }
    }

    /// Turns one raw result into a finding.
    ///
    /// Returns `None` when the result has no check or the check has an empty
    /// id. A configuration without
    /// usable line markers locates the finding at `(0, 0)`.
    pub fn build(
        &self,
        path: &Path,
        result_key: &str,
        result: RawCheckResult,
        lines: &[RawLine],
    ) -> Option<Finding> {
        let check = result.check.filter(|check| !check.id.is_empty())?;

        let (start, end) = result
            .result_configuration
            .as_ref()
            .and_then(|config| self.family.start_end_lines(config))
            .unwrap_or((0, 0));

        let structure = self
            .family
            .check_type()
            .is_pipeline()
            .then(|| self.metadata.cloned().unwrap_or_default());

        Some(Finding {
            resource: self
                .family
                .resource_id(path, result_key, &check.supported_entities),
            check_id: check.id,
            bc_check_id: check.bc_id,
            check_name: check.name,
            check_result: result.outcome,
            evaluated_keys: result.evaluated_keys,
            code_block: code_snippet(lines, start, end),
            file_path: self.path_display.display_path(path, self.root),
            file_line_range: (start, end + 1),
            check_class: check.class_name,
            file_abs_path: absolute(path),
            severity: check.severity,
            structure,
        })
    }
}
