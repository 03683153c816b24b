//! # confcheck_core
//!
//! Scan orchestration core for confcheck.
//!
//! This crate provides:
//! - The `Runner` orchestrator for one document family
//! - Directory traversal with exclusion filtering
//! - Parallel document loading
//! - Conversion of raw check results into located findings
//! - Structural metadata of pipeline definitions (jobs and triggers)
//!
//! Check evaluation itself lives behind the [`CheckRegistry`] trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use confcheck_core::{GithubActionsFamily, Runner, ScanFilter};
//!
//! let runner = Runner::new(GithubActionsFamily::<MyRegistry>::new());
//! let filter = ScanFilter::from_file("confcheck.json")?;
//!
//! let report = runner.run(Some(Path::new(".")), &[], &[], &filter)?;
//! for finding in report.failed() {
//!     println!("{}{:?}: {}", finding.file_path, finding.file_line_range, finding.check_id);
//! }
//! ```

mod config;
mod document;
mod error;
pub mod families;
mod family;
mod finding;
mod loader;
pub mod path_filter;
mod registry;
mod report;
mod runner;
pub mod structure;
mod suppression;
pub mod yaml;

pub use config::ScanFilter;
pub use document::{END_LINE, Key, Mapping, Node, ParsedFile, RawLine, START_LINE, raw_lines};
pub use error::ScanError;
pub use families::{GithubActionsFamily, YamlFamily};
pub use family::{CheckType, DocumentFamily, marker_line_range};
pub use finding::{Finding, FindingBuilder, PathDisplay, code_snippet};
pub use loader::{LoadOutcome, LoadedFiles, load_files};
pub use path_filter::PathFilter;
pub use registry::{CheckIdentity, CheckOutcome, CheckRegistry, RawCheckResult, ScanResults, Severity};
pub use report::{Report, Summary};
pub use runner::Runner;
pub use structure::{RunMetadata, StructuralUnit};
pub use suppression::{CommentDirectives, SuppressionCollector, Suppressions};

#[cfg(test)]
pub mod test_utils;
