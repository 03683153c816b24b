//! Directory entry filtering and candidate discovery.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::ScanError;

/// Directory names that are never traversed.
pub const IGNORED_DIRECTORIES: &[&str] = &["node_modules", ".terraform", ".serverless"];

/// Removes excluded entries from directory listings.
///
/// Two rules apply. Entries named like an [`IGNORED_DIRECTORIES`] member are
/// always dropped, and entries starting with `.` are dropped unless they
/// appear in the inclusion list.
/// Entries whose root-joined path matches an exclusion glob, or contains an
/// exclusion pattern verbatim, are dropped as well.
pub struct PathFilter {
    excluded_patterns: Vec<String>,
    excluded_globs: Option<GlobSet>,
    included_paths: Vec<String>,
}

impl PathFilter {
    pub fn new(excluded_paths: &[String], included_paths: &[String]) -> Self {
        Self {
            excluded_patterns: excluded_paths.to_vec(),
            excluded_globs: Self::build_globset(excluded_paths),
            included_paths: included_paths.to_vec(),
        }
    }

    /// Builds a GlobSet from exclusion patterns.
    ///
    /// Patterns that are not valid globs still act as substring matches,
    /// so they are only logged here.
    fn build_globset(patterns: &[String]) -> Option<GlobSet> {
        if patterns.is_empty() {
            return None;
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    warn!("Exclusion pattern {:?} is not a glob: {}", pattern, e);
                }
            }
        }
        match builder.build() {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Failed to build exclusion glob set: {}", e);
                None
            }
        }
    }

    /// Checks if a directory entry named `name` under `root` should be skipped.
    pub fn is_ignored(&self, root: &Path, name: &str) -> bool {
        let hidden = name.starts_with('.') && !self.included_paths.iter().any(|p| p == name);
        if hidden || IGNORED_DIRECTORIES.contains(&name) {
            return true;
        }

        if self.excluded_patterns.is_empty() {
            return false;
        }

        let full_path = root.join(name);
        if self
            .excluded_globs
            .as_ref()
            .is_some_and(|globs| globs.is_match(&full_path))
        {
            return true;
        }

        let full_path = full_path.to_string_lossy();
        self.excluded_patterns
            .iter()
            .any(|p| full_path.contains(p.as_str()))
    }

    /// Removes ignored names from a directory listing, keeping order.
    ///
    /// For callers that hold one directory's listing, such as a host doing
    /// its own traversal. [`PathFilter::walk`] applies the same rules per
    /// entry while it descends.
    pub fn filter_in_place(&self, root: &Path, names: &mut Vec<String>) {
        names.retain(|name| !self.is_ignored(root, name));
    }

    /// Walks `root` and returns every file that survives filtering, as
    /// paths relative to `root`.
    ///
    /// Ignored directories are pruned rather than descended into. Only a
    /// failure at the root itself is returned as an error; unreadable
    /// entries below it are skipped.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let parent = entry.path().parent().unwrap_or(root);
            let name = entry.file_name().to_string_lossy();
            !self.is_ignored(parent, &name)
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| entry.path().to_path_buf());
                files.push(relative);
            }
        }

        files.sort();
        info!("Discovered {} candidate files", files.len());
        Ok(files)
    }
}
