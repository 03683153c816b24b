//! Scan error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a scan run.
///
/// Per-file problems never surface here: a file that fails to parse is
/// omitted and a finding with unusable location data falls back to an
/// empty range.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scan root does not exist or is not a directory.
    #[error("Scan root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// External checks could not be loaded into the registry.
    #[error("Registry error: {0}")]
    Registry(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error at the scan root.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry(message.into())
    }
}
