//! Scan orchestration.
//!
//! A [`Runner`] ties one [`DocumentFamily`] to the shared pipeline:
//! discovery, parallel parsing, per-file suppression collection and
//! registry dispatch, then finding construction into a [`Report`].

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ScanFilter;
use crate::error::ScanError;
use crate::family::DocumentFamily;
use crate::finding::{FindingBuilder, PathDisplay};
use crate::loader::{LoadOutcome, LoadedFiles, load_files};
use crate::path_filter::PathFilter;
use crate::registry::CheckRegistry;
use crate::report::Report;
use crate::structure::RunMetadata;
use crate::suppression::{CommentDirectives, SuppressionCollector};

/// Runs the checks of one document family over files and directories.
pub struct Runner<F: DocumentFamily> {
    family: F,
    collector: Box<dyn SuppressionCollector>,
    path_display: PathDisplay,
}

impl<F: DocumentFamily> Runner<F> {
    /// Creates a runner using comment directives for suppressions and
    /// root-relative display paths.
    pub fn new(family: F) -> Self {
        Self {
            family,
            collector: Box::new(CommentDirectives),
            path_display: PathDisplay::default(),
        }
    }

    pub fn with_path_display(mut self, path_display: PathDisplay) -> Self {
        self.path_display = path_display;
        self
    }

    pub fn with_suppression_collector(
        mut self,
        collector: impl SuppressionCollector + 'static,
    ) -> Self {
        self.collector = Box::new(collector);
        self
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    /// Scans an explicit file list and/or a root directory.
    ///
    /// With neither a root nor files, or when the family needs external
    /// checks and none are given, the report is empty. Only a missing root
    /// or an external checks directory the registry rejects is an error;
    /// per-file problems never abort the run.
    pub fn run(
        &self,
        root: Option<&Path>,
        external_checks_dirs: &[PathBuf],
        files: &[PathBuf],
        filter: &ScanFilter,
    ) -> Result<Report, ScanError> {
        let mut report = Report::new(self.family.check_type());

        if root.is_none() && files.is_empty() {
            debug!("No resources to scan.");
            return Ok(report);
        }
        if external_checks_dirs.is_empty() && self.family.require_external_checks() {
            debug!("The runner requires that external checks are defined.");
            return Ok(report);
        }

        let mut registry = self.family.import_registry();
        for directory in external_checks_dirs {
            registry.load_external_checks(directory)?;
        }

        let (loaded, metadata) = self.load(root, files, filter)?;
        info!("Loaded {} {} files", loaded.len(), self.family.check_type());

        let builder = FindingBuilder::new(&self.family, root, self.path_display, metadata.as_ref());
        for (path, parsed) in &loaded {
            let suppressions = self.collector.collect(&parsed.lines);
            let results = registry.scan(path, &parsed.document, &suppressions, filter);
            debug!("Scanned {}: {} results", path.display(), results.len());

            for (result_key, result) in results {
                match builder.build(path, &result_key, result, &parsed.lines) {
                    Some(finding) => report.add_finding(finding),
                    None => debug!("Dropping result {} without a check", result_key),
                }
            }
        }

        Ok(report)
    }

    /// Loads the explicit files first, then everything under the root.
    fn load(
        &self,
        root: Option<&Path>,
        files: &[PathBuf],
        filter: &ScanFilter,
    ) -> Result<(LoadedFiles, Option<RunMetadata>), ScanError> {
        let mut loaded = LoadedFiles::new();
        let mut metadata = None;
        let mut absorb = |outcome: LoadOutcome| {
            loaded.extend(outcome.files);
            if outcome.metadata.is_some() {
                metadata = outcome.metadata;
            }
        };

        if !files.is_empty() {
            absorb(load_files(&self.family, files, None));
        }

        if let Some(root) = root {
            let path_filter = PathFilter::new(&filter.excluded_paths, &self.family.included_paths());
            let candidates = path_filter.walk(root)?;
            let join = |relative: &Path| root.join(relative);
            absorb(load_files(&self.family, &candidates, Some(&join)));
        }

        Ok((loaded, metadata))
    }
}
